mod registry;
pub use registry::*;

use axum::http::HeaderValue;
use std::env;
use std::path::PathBuf;
use crate::{Error, SchoolType, DEFAULT_ALLOWED_ORIGIN, DEFAULT_DATA_DIR, DEFAULT_GEOJSON_FILE};

#[derive(Debug, Clone)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

impl AllowedOrigin {
    pub fn parse(origin: &str) -> Result<Self, Error> {
        if origin == "*" {
            return Ok(AllowedOrigin::Any);
        }

        HeaderValue::from_str(origin)
            .map(AllowedOrigin::Exact)
            .map_err(|_| Error::Config(format!("Invalid NYC_ALLOWED_ORIGIN: {}", origin)))
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub geojson_file: String,
    pub allowed_origin: AllowedOrigin,
    pub registry: SchoolTypeRegistry,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let data_dir = lookup("NYC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let geojson_file = lookup("NYC_GEOJSON_FILE")
            .unwrap_or_else(|| DEFAULT_GEOJSON_FILE.to_string());
        if geojson_file.trim().is_empty() {
            return Err(Error::Config("NYC_GEOJSON_FILE is empty".to_string()));
        }

        let allowed_origin = AllowedOrigin::parse(
            &lookup("NYC_ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
        )?;

        let mut registry = SchoolTypeRegistry::default();
        for school_type in SchoolType::ALL {
            let var = format!("NYC_DATASET_{}", school_type.key().to_uppercase());
            if let Some(location) = lookup(&var) {
                if location.trim().is_empty() {
                    return Err(Error::Config(format!("{} is empty", var)));
                }
                registry = registry.with_source(school_type, location);
            }
        }

        Ok(Self {
            data_dir,
            geojson_file,
            allowed_origin,
            registry,
        })
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self
    }
}
