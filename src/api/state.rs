use bytes::Bytes;
use object_store::{local::LocalFileSystem, path::Path, ObjectStore};
use std::sync::Arc;
use tracing::info;
use crate::{Error, MetricAggregator, ObjectStoreSource, ServerConfig};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<MetricAggregator>,
    /// District boundary GeoJSON, served as-is.
    pub boundaries: Bytes,
}

impl AppState {
    pub fn new(aggregator: Arc<MetricAggregator>, boundaries: Bytes) -> Self {
        Self { aggregator, boundaries }
    }

    /// Opens the data directory and reads the boundary file. A missing boundary
    /// file is a deployment fault and fails here rather than per request.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        let store = open_store(config)?;

        let boundaries = store
            .get(&Path::from(config.geojson_file.as_str()))
            .await
            .map_err(|e| {
                Error::Config(format!(
                    "Boundary file {} unavailable: {}",
                    config.geojson_file, e
                ))
            })?
            .bytes()
            .await?;

        info!(
            "Loaded district boundaries from {} ({} bytes)",
            config.geojson_file,
            boundaries.len()
        );

        let source = Arc::new(ObjectStoreSource::new(store, config.registry.clone()));
        Ok(Self::new(Arc::new(MetricAggregator::new(source)), boundaries))
    }
}

pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn ObjectStore>, Error> {
    let store = LocalFileSystem::new_with_prefix(&config.data_dir).map_err(|e| {
        Error::Config(format!(
            "Cannot open data directory {}: {}",
            config.data_dir.display(),
            e
        ))
    })?;
    Ok(Arc::new(store))
}
