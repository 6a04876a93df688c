//! Conversion of an Arrow `RecordBatch` into an [`OhlcvTable`].

use arrow::array::{Array, Float64Array, Int64Array, TimestampNanosecondArray};
use arrow::record_batch::RecordBatch;

use crate::error::DataError;
use crate::validation::validate_table;
use theta_types::{Bar, OhlcvTable, Timeframe};

/// Column holding the bar open time.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Optional column holding the bar close time.
pub const CLOSE_TIME_COLUMN: &str = "close_time";

/// Builds a validated table from a batch with columns
/// `timestamp` (timestamp ns or int64), `open`, `high`, `low`, `close` (float64)
/// and `volume` (float64 or int64). An optional `close_time` column overrides
/// the close time derived from `timeframe`.
///
/// # Errors
/// - [`DataError::MissingColumn`] / [`DataError::InvalidColumnType`] for schema problems.
/// - [`DataError::CorruptData`] for null cells.
/// - Any error of [`validate_table`].
pub fn ohlcv_from_record_batch(
    batch: &RecordBatch,
    timeframe: Option<Timeframe>,
) -> Result<OhlcvTable, DataError> {
    let timestamps = int_column(batch, TIMESTAMP_COLUMN)?.ok_or_else(|| {
        DataError::MissingColumn(TIMESTAMP_COLUMN.to_string())
    })?;
    let close_times = int_column(batch, CLOSE_TIME_COLUMN)?;

    let open = numeric_column(batch, "open")?;
    let high = numeric_column(batch, "high")?;
    let low = numeric_column(batch, "low")?;
    let close = numeric_column(batch, "close")?;
    let volume = numeric_column(batch, "volume")?;

    let mut bars = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let ts = timestamps.value(row)?;
        let mut bar = match timeframe {
            Some(tf) => Bar::with_timeframe(
                ts,
                tf,
                open.value(row)?,
                high.value(row)?,
                low.value(row)?,
                close.value(row)?,
                volume.value(row)?,
            ),
            None => Bar::new(
                ts,
                open.value(row)?,
                high.value(row)?,
                low.value(row)?,
                close.value(row)?,
                volume.value(row)?,
            ),
        };
        if let Some(ct) = &close_times {
            bar.close_time_ns = ct.value(row)?;
        }
        bars.push(bar);
    }

    let table = OhlcvTable { timeframe, bars };
    validate_table(&table)?;
    tracing::debug!(rows = table.len(), "loaded OHLCV table from record batch");
    Ok(table)
}

enum IntAccessor<'a> {
    Timestamp(&'a TimestampNanosecondArray),
    I64(&'a Int64Array),
}

impl IntAccessor<'_> {
    fn value(&self, idx: usize) -> Result<i64, DataError> {
        let (is_null, value) = match self {
            IntAccessor::Timestamp(arr) => (arr.is_null(idx), arr.value(idx)),
            IntAccessor::I64(arr) => (arr.is_null(idx), arr.value(idx)),
        };
        if is_null {
            return Err(DataError::CorruptData(format!("Null timestamp at row {idx}")));
        }
        Ok(value)
    }
}

struct NumericAccessor<'a> {
    name: &'static str,
    inner: NumericInner<'a>,
}

enum NumericInner<'a> {
    F64(&'a Float64Array),
    I64(&'a Int64Array),
}

impl NumericAccessor<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, idx: usize) -> Result<f64, DataError> {
        let (is_null, value) = match self.inner {
            NumericInner::F64(arr) => (arr.is_null(idx), arr.value(idx)),
            NumericInner::I64(arr) => (arr.is_null(idx), arr.value(idx) as f64),
        };
        if is_null {
            return Err(DataError::CorruptData(format!(
                "Null {} at row {idx}",
                self.name
            )));
        }
        Ok(value)
    }
}

fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<Option<IntAccessor<'a>>, DataError> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    if let Some(arr) = col.as_any().downcast_ref::<TimestampNanosecondArray>() {
        Ok(Some(IntAccessor::Timestamp(arr)))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(Some(IntAccessor::I64(arr)))
    } else {
        Err(DataError::InvalidColumnType(name.to_string()))
    }
}

fn numeric_column<'a>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<NumericAccessor<'a>, DataError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;

    let inner = if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        NumericInner::F64(arr)
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        NumericInner::I64(arr)
    } else {
        return Err(DataError::InvalidColumnType(name.to_string()));
    };
    Ok(NumericAccessor { name, inner })
}
