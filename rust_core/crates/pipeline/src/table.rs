//! Final feature table.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, TimestampNanosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use theta_data::TIMESTAMP_COLUMN;
use theta_types::CandidateColumn;

use crate::error::PipelineError;

/// Selected columns aligned with the input rows.
///
/// Every column shares its buffer with the matching candidate column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Input bar open times.
    pub timestamps: Arc<[i64]>,
    /// Selected columns, best ranked first.
    pub columns: Vec<CandidateColumn>,
}

impl FeatureTable {
    /// Creates a table.
    #[must_use]
    pub fn new(timestamps: Arc<[i64]>, columns: Vec<CandidateColumn>) -> Self {
        Self {
            timestamps,
            columns,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.timestamps.len()
    }

    /// Number of feature columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when no column was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in table order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&CandidateColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Exports to an Arrow batch: a UTC nanosecond `timestamp` column followed
    /// by one nullable float64 column per feature (NaN is kept as NaN).
    ///
    /// # Errors
    /// Returns [`PipelineError::Export`] when Arrow rejects the batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch, PipelineError> {
        let mut fields = Vec::with_capacity(self.columns.len() + 1);
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len() + 1);

        fields.push(Field::new(
            TIMESTAMP_COLUMN,
            DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into())),
            false,
        ));
        arrays.push(Arc::new(
            TimestampNanosecondArray::from(self.timestamps.to_vec()).with_timezone("UTC"),
        ));

        for column in &self.columns {
            fields.push(Field::new(column.name.as_str(), DataType::Float64, true));
            arrays.push(Arc::new(Float64Array::from(column.values.to_vec())));
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}
