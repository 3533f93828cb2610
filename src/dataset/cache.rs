use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;
use crate::{Dataset, DatasetSource, Error, SchoolType};

/// Lazily loads each school type's dataset at most once and shares it read-only.
///
/// Concurrent first requests for the same key wait on a single load. A failed
/// load leaves the slot empty, so the next request tries again.
pub struct DatasetCache {
    source: Arc<dyn DatasetSource>,
    slots: DashMap<SchoolType, Arc<OnceCell<Arc<Dataset>>>>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            slots: DashMap::new(),
        }
    }

    pub async fn get(&self, school_type: SchoolType) -> Result<Arc<Dataset>, Error> {
        // Clone the slot out so the map shard is not locked across the load.
        let slot = self.slots.entry(school_type).or_default().clone();

        slot.get_or_try_init(|| async {
            debug!("Dataset cache miss for {}", school_type);
            self.source.load(school_type).await.map(Arc::new)
        })
        .await
        .cloned()
    }

    pub fn loaded(&self) -> Vec<SchoolType> {
        let mut loaded: Vec<SchoolType> = self
            .slots
            .iter()
            .filter(|slot| slot.value().initialized())
            .map(|slot| *slot.key())
            .collect();
        loaded.sort();
        loaded
    }
}
