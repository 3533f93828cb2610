use arrow::compute::concat_batches;
use arrow::csv::{reader::Format, ReaderBuilder};
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::ObjectStore;
use parquet::arrow::arrow_reader::ParquetRecordBatchReader;
use regex::Regex;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, error, info};
use crate::{Dataset, Error, SchoolType, SchoolTypeRegistry, BATCH_SIZE, MISSING_VALUE_MARKERS};

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Loads the complete table for `school_type`, or fails with `InvalidSchoolType`.
    async fn load(&self, school_type: SchoolType) -> Result<Dataset, Error>;
}

/// Reads datasets out of an object store using the registry's locations.
pub struct ObjectStoreSource {
    store: Arc<dyn ObjectStore>,
    registry: SchoolTypeRegistry,
}

impl ObjectStoreSource {
    pub fn new(store: Arc<dyn ObjectStore>, registry: SchoolTypeRegistry) -> Self {
        Self { store, registry }
    }

    async fn read_dataset(&self, school_type: SchoolType) -> Result<Dataset, Error> {
        let location = self.registry.path(school_type).ok_or_else(|| {
            Error::Config(format!("No dataset registered for school type {}", school_type))
        })?;

        debug!("Reading {} dataset from {}", school_type, location);

        let bytes = self.store.get(&location).await?.bytes().await?;

        let batch = if location.as_ref().to_lowercase().ends_with(".parquet") {
            parse_parquet(bytes)?
        } else {
            parse_csv(bytes)?
        };

        Dataset::new(school_type, batch)
    }
}

#[async_trait]
impl DatasetSource for ObjectStoreSource {
    async fn load(&self, school_type: SchoolType) -> Result<Dataset, Error> {
        match self.read_dataset(school_type).await {
            Ok(dataset) => {
                info!(
                    "Loaded {} dataset: {} rows, {} columns",
                    school_type,
                    dataset.num_rows(),
                    dataset.schema().fields().len()
                );
                Ok(dataset)
            }
            Err(e) => {
                error!("Failed to load {} dataset: {}", school_type, e);
                Err(Error::InvalidSchoolType(school_type.to_string()))
            }
        }
    }
}

/// Matches a whole cell holding one of the missing value markers.
pub fn missing_value_regex() -> Result<Regex, Error> {
    let markers = MISSING_VALUE_MARKERS
        .iter()
        .map(|marker| regex::escape(marker))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!("^(?:{})$", markers))
        .map_err(|e| Error::Config(format!("Invalid missing value pattern: {}", e)))
}

/// Parses a CSV document with a header row, inferring column types from every record.
///
/// Missing value markers are nulls both while inferring and while decoding, so a
/// numeric column holding "N/A" stays numeric.
pub fn parse_csv(bytes: Bytes) -> Result<RecordBatch, Error> {
    let null_regex = missing_value_regex()?;
    let format = Format::default()
        .with_header(true)
        .with_null_regex(null_regex.clone());
    let (schema, records) = format.infer_schema(Cursor::new(bytes.clone()), None)?;
    let schema = Arc::new(schema);

    debug!("Inferred CSV schema over {} records: {:?}", records, schema);

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_null_regex(null_regex)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(bytes))?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

pub fn parse_parquet(bytes: Bytes) -> Result<RecordBatch, Error> {
    let reader = ParquetRecordBatchReader::try_new(bytes, BATCH_SIZE)?;
    let schema = reader.schema();

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}
