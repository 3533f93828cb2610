use serde::{Deserialize, Serialize};
use crate::DistrictAggregates;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub loaded_datasets: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SchoolTypeQuery {
    #[serde(rename = "schoolType")]
    pub school_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetricQuery {
    #[serde(rename = "schoolType")]
    pub school_type: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictAveragesResponse {
    pub district_averages: DistrictAggregates,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxValueResponse {
    /// `null` when a numeric metric has no values.
    pub max_value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
