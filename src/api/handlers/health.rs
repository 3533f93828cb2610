use axum::{
    extract::State,
    response::{Json, IntoResponse},
    http::StatusCode,
};
use std::sync::Arc;
use time::OffsetDateTime;
use crate::{AppState, HealthResponse};

pub async fn index() -> &'static str {
    "NYC Heatmap Backend API"
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc().to_string(),
        loaded_datasets: state
            .aggregator
            .loaded_school_types()
            .into_iter()
            .map(String::from)
            .collect(),
    };

    (StatusCode::OK, Json(response))
}
