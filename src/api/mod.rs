mod handlers;
mod types;
mod state;
pub use handlers::*;
pub use types::*;
pub use state::*;

use tokio::net::TcpListener;
use axum::{
    Router,
    routing::get
};
use tower_http::cors::{Any, CorsLayer};
use std::sync::Arc;
use std::net::SocketAddr;
use tracing::info;
use anyhow::Result;
use std::time::Duration;
use crate::{AllowedOrigin, ServerConfig};

pub fn cors_layer(allowed_origin: &AllowedOrigin) -> CorsLayer {
    let cors = match allowed_origin {
        AllowedOrigin::Any => CorsLayer::new().allow_origin(Any),
        AllowedOrigin::Exact(origin) => CorsLayer::new().allow_origin(origin.clone()),
    };

    cors.allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

pub fn router(state: Arc<AppState>, allowed_origin: &AllowedOrigin) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/districts", get(get_district_data))
        .route("/max_value", get(get_max_value))
        .route("/geojson", get(get_geojson))
        .layer(cors_layer(allowed_origin))
        .with_state(state)
}

pub async fn serve(host: String, port: u16, config: ServerConfig) -> Result<()> {
    // Fails before binding if the data directory or boundary file is missing
    let state = Arc::new(AppState::from_config(&config).await?);

    let app = router(state, &config.allowed_origin);

    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()?;

    let listener = TcpListener::bind(&addr).await?;

    info!("API server listening on {} (data from {})", addr, config.data_dir.display());

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
