//! Data-layer error types.

use thiserror::Error;

/// Structural problems with an input table. Always fatal for a pipeline run.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// No rows were supplied.
    #[error("Empty data")]
    EmptyData,

    /// A required column is missing from a tabular source.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column has an unexpected data type.
    #[error("Invalid column type: {0}")]
    InvalidColumnType(String),

    /// A value is NaN or infinite.
    #[error("Non-finite value at index {index}: {field}={value}")]
    NonFinite {
        /// Row index.
        index: usize,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Timestamps are not strictly increasing.
    #[error("Non-monotonic timestamp at index {index}: {current} <= {previous}")]
    NonMonotonic {
        /// Row index.
        index: usize,
        /// Timestamp of the previous row.
        previous: i64,
        /// Timestamp of this row.
        current: i64,
    },

    /// Data violated an OHLCV invariant.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// A series does not match the table's row count.
    #[error("Length mismatch for {name}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Series name.
        name: String,
        /// Table row count.
        expected: usize,
        /// Series length.
        actual: usize,
    },
}
