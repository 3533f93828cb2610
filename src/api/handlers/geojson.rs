use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use crate::AppState;

pub async fn get_geojson(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.boundaries.clone(),
    )
}
