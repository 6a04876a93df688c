//! Theta Data
//!
//! Input validation, no-look-ahead timeframe alignment, resampling and Arrow
//! ingestion for OHLCV tables.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]

/// Coarse-to-base timeframe alignment.
pub mod alignment;
/// Data-layer error types.
pub mod error;
/// Arrow `RecordBatch` ingestion.
pub mod record_batch;
/// Timeframe resampling.
pub mod resample;
/// Structural validation of input tables.
pub mod validation;

pub use alignment::{
    TimeframeMapping, base_completion_times, build_mapping, coarse_completion_times, forward_fill,
    infers_completion, map_tables,
};
pub use error::DataError;
pub use record_batch::{CLOSE_TIME_COLUMN, TIMESTAMP_COLUMN, ohlcv_from_record_batch};
pub use resample::resample;
pub use validation::{validate_bars, validate_series_length, validate_table};
