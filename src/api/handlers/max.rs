use axum::{
    extract::{State, Query},
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, info};
use crate::{AppState, Error, MaxValueResponse, MetricQuery,
    api::handlers::common::{require_metric, school_type_or_default}};

pub async fn get_max_value(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MetricQuery>,
) -> Result<Json<MaxValueResponse>, Error> {
    let school_type = school_type_or_default(&params.school_type);
    let metric = require_metric(&params.metric)?;

    info!(
        "Received max value request - School Type: {}, Metric: {}",
        school_type, metric
    );

    let max_value = state.aggregator.max_value(&school_type, metric).await?;

    debug!("Max value for '{}' in {}: {:?}", metric, school_type, max_value);
    Ok(Json(MaxValueResponse { max_value }))
}
