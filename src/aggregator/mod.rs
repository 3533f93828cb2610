mod classify;
mod district;
pub use classify::*;
pub use district::*;

use std::sync::Arc;
use tracing::{info, warn};
use crate::{Dataset, DatasetCache, DatasetSource, DistrictAggregates, Error, MetricKind, SchoolType};

/// Entry point for every query: resolves the school type, fetches the cached
/// dataset and runs the requested aggregation over it.
pub struct MetricAggregator {
    cache: DatasetCache,
}

impl MetricAggregator {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            cache: DatasetCache::new(source),
        }
    }

    pub async fn dataset(&self, school_type: &str) -> Result<Arc<Dataset>, Error> {
        let school_type: SchoolType = school_type.parse().inspect_err(|_| {
            warn!("Rejected unknown school type: {}", school_type);
        })?;
        self.cache.get(school_type).await
    }

    pub async fn list_metrics(&self, school_type: &str) -> Result<Vec<String>, Error> {
        let dataset = self.dataset(school_type).await?;
        Ok(list_metrics(&dataset))
    }

    pub async fn classify(&self, school_type: &str, metric: &str) -> Result<MetricKind, Error> {
        let dataset = self.dataset(school_type).await?;
        classify(&dataset, metric)
    }

    pub async fn district_aggregates(
        &self,
        school_type: &str,
        metric: &str,
    ) -> Result<DistrictAggregates, Error> {
        let dataset = self.dataset(school_type).await?;
        let aggregates = aggregate_by_district(&dataset, metric)?;

        info!(
            "Aggregated '{}' for {} across {} districts",
            metric,
            school_type,
            aggregates.len()
        );
        Ok(aggregates)
    }

    pub async fn max_value(&self, school_type: &str, metric: &str) -> Result<Option<f64>, Error> {
        let dataset = self.dataset(school_type).await?;
        max_value(&dataset, metric)
    }

    pub fn loaded_school_types(&self) -> Vec<SchoolType> {
        self.cache.loaded()
    }
}
