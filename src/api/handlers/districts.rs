use axum::{
    extract::{State, Query},
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};
use crate::{AppState, DistrictAveragesResponse, Error, MetricQuery,
    api::handlers::common::{require_metric, school_type_or_default}};

pub async fn get_district_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetricQuery>,
) -> Result<Json<DistrictAveragesResponse>, Error> {
    let school_type = school_type_or_default(&params.school_type);
    let metric = require_metric(&params.metric)?;

    info!(
        "Received district request - School Type: {}, Metric: {}",
        school_type, metric
    );

    let district_averages = state
        .aggregator
        .district_aggregates(&school_type, metric)
        .await
        .inspect_err(|e| warn!("District request rejected: {}", e))?;

    Ok(Json(DistrictAveragesResponse { district_averages }))
}
