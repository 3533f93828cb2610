pub mod aggregator;
pub mod api;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod models;
pub mod validator;

#[cfg(test)]
mod tests;

pub use aggregator::*;
pub use api::*;
pub use config::*;
pub use constants::*;
pub use dataset::*;
pub use error::*;
pub use models::*;
pub use validator::{validate_metric, ValidationStats, Validator};

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
