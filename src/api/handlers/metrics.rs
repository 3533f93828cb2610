use axum::{
    extract::{State, Query},
    response::Json,
};
use std::sync::Arc;
use tracing::info;
use crate::{AppState, Error, MetricsResponse, SchoolTypeQuery,
    api::handlers::common::school_type_or_default};

pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SchoolTypeQuery>,
) -> Result<Json<MetricsResponse>, Error> {
    let school_type = school_type_or_default(&params.school_type);

    info!("Received metrics request - School Type: {}", school_type);

    let metrics = state.aggregator.list_metrics(&school_type).await?;

    info!("Returning {} metrics for {}", metrics.len(), school_type);
    Ok(Json(MetricsResponse { metrics }))
}
