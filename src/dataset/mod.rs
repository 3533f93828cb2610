mod cache;
mod loader;
pub use cache::*;
pub use loader::*;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;
use tracing::error;
use crate::{Error, SchoolType, DISTRICT_COLUMN, ID_COLUMNS};

/// One school type's table, fully loaded and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    school_type: SchoolType,
    batch: RecordBatch,
}

impl Dataset {
    pub fn new(school_type: SchoolType, batch: RecordBatch) -> Result<Self, Error> {
        if batch.column_by_name(DISTRICT_COLUMN).is_none() {
            return Err(Error::Dataset(format!(
                "{} dataset has no {} column",
                school_type, DISTRICT_COLUMN
            )));
        }

        Ok(Self { school_type, batch })
    }

    pub fn school_type(&self) -> SchoolType {
        self.school_type
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// Column names in native order, without the identifier columns.
    pub fn metric_names(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| !ID_COLUMNS.contains(&name.as_str()))
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef, Error> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| Error::MetricNotFound(name.to_string()))
    }

    pub fn data_type(&self, name: &str) -> Result<&DataType, Error> {
        Ok(self.column(name)?.data_type())
    }

    /// District code per row; rows with an unparseable code come back as `None`.
    pub fn district_codes(&self) -> Result<Vec<Option<i64>>, Error> {
        let codes = cast(self.column(DISTRICT_COLUMN)?, &DataType::Int64)?;
        let codes = downcast::<Int64Array>(&codes, DISTRICT_COLUMN)?;
        Ok(codes.iter().collect())
    }

    /// Column values as floats, with NaN folded into missing.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>, Error> {
        let values = cast(self.column(name)?, &DataType::Float64)?;
        let values = downcast::<Float64Array>(&values, name)?;
        Ok(values
            .iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect())
    }

    /// Column values rendered as text labels.
    pub fn label_values(&self, name: &str) -> Result<Vec<Option<String>>, Error> {
        let labels = cast(self.column(name)?, &DataType::Utf8)?;
        let labels = downcast::<StringArray>(&labels, name)?;
        Ok(labels
            .iter()
            .map(|label| label.map(str::to_string))
            .collect())
    }
}

fn downcast<'a, A: Array + 'static>(array: &'a ArrayRef, name: &str) -> Result<&'a A, Error> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        error!("Failed to cast {} column to {}", name, std::any::type_name::<A>());
        Error::Dataset(format!("Unexpected array type for column {}", name))
    })
}
