// Submodules
pub mod common;  // Query parameter helpers shared by the metric endpoints
pub mod health;  // Index and health check endpoints

// Data endpoints
pub mod metrics;
pub mod districts;
pub mod max;
pub mod geojson;

// Re-exports
pub use health::{health_check, index};
pub use metrics::get_metrics;
pub use districts::get_district_data;
pub use max::get_max_value;
pub use geojson::get_geojson;
