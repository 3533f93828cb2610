use crate::{Dataset, Error, MetricKind};

/// Metric columns of `dataset` in their native order.
pub fn list_metrics(dataset: &Dataset) -> Vec<String> {
    dataset.metric_names()
}

/// Decides how a metric is aggregated.
///
/// A numeric column is always `Numeric`, whatever its name says. Otherwise the
/// name decides: "Rating" before "Quality Review", then generic categorical.
pub fn classify(dataset: &Dataset, metric: &str) -> Result<MetricKind, Error> {
    let data_type = dataset.data_type(metric)?;
    Ok(MetricKind::from_column(metric, data_type))
}
