use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::{classify, district_sums, Dataset, MetricAggregator, MetricKind, SchoolType, VALIDATION_TOLERANCE_PERCENT};

/// Cross-checks numeric district means against the column mean: the means
/// weighted by each district's value count must reproduce the overall mean.
#[derive(Debug)]
pub struct ValidationStats {
    pub overall_mean: f64,
    pub weighted_district_mean: f64,
    pub difference: f64,
    pub difference_percent: f64,
    pub value_count: u64,
    pub district_count: usize,
}

pub struct Validator {
    aggregator: Arc<MetricAggregator>,
}

impl Validator {
    pub fn new(aggregator: Arc<MetricAggregator>) -> Self {
        Self { aggregator }
    }

    /// Results keyed by `<school type>/<metric>`.
    pub async fn validate_all(&self, school_types: &[SchoolType]) -> Result<BTreeMap<String, ValidationStats>> {
        let datasets = try_join_all(school_types.iter().map(|school_type| async move {
            self.aggregator
                .dataset(school_type.key())
                .await
                .with_context(|| format!("Failed to load {} dataset", school_type))
        }))
        .await?;

        let mut results = BTreeMap::new();

        for dataset in datasets {
            for metric in dataset.metric_names() {
                if classify(&dataset, &metric)? != MetricKind::Numeric {
                    continue;
                }

                let Some(stats) = validate_metric(&dataset, &metric)? else {
                    debug!("Skipping {}/{}: no values", dataset.school_type(), metric);
                    continue;
                };

                let key = format!("{}/{}", dataset.school_type(), metric);
                self.log_validation_results(&key, &stats);
                results.insert(key, stats);
            }
        }

        Ok(results)
    }

    fn log_validation_results(&self, key: &str, stats: &ValidationStats) {
        if stats.difference_percent.abs() > VALIDATION_TOLERANCE_PERCENT {
            warn!(
                "{}: overall mean {:.6} vs weighted district mean {:.6} ({:.6}%)",
                key, stats.overall_mean, stats.weighted_district_mean, stats.difference_percent
            );
        } else {
            info!(
                "{}: {} values across {} districts, mean {:.6}",
                key, stats.value_count, stats.district_count, stats.overall_mean
            );
        }
    }
}

/// `None` when the metric has no value in any district.
pub fn validate_metric(dataset: &Dataset, metric: &str) -> Result<Option<ValidationStats>> {
    let sums = district_sums(dataset, metric)?;

    let value_count: u64 = sums.values().map(|(_, count)| count).sum();
    if value_count == 0 {
        return Ok(None);
    }

    // Rows outside any valid district never reach an aggregate, so the overall
    // mean covers exactly the rows the district sums saw.
    let overall_mean = sums.values().map(|(sum, _)| sum).sum::<f64>() / value_count as f64;

    let weighted_district_mean = sums
        .values()
        .map(|(sum, count)| (sum / *count as f64) * *count as f64)
        .sum::<f64>()
        / value_count as f64;

    let difference = (overall_mean - weighted_district_mean).abs();
    let difference_percent = if overall_mean != 0.0 {
        difference / overall_mean.abs() * 100.0
    } else {
        difference * 100.0
    };

    Ok(Some(ValidationStats {
        overall_mean,
        weighted_district_mean,
        difference,
        difference_percent,
        value_count,
        district_count: sums.len(),
    }))
}
