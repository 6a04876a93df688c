//! Structural validation of OHLCV input.

use crate::error::DataError;
use theta_types::{Bar, OhlcvTable};

/// Validates a sequence of bars against the input-table invariants.
///
/// # Errors
/// - [`DataError::EmptyData`] when `bars` is empty.
/// - [`DataError::NonFinite`] for NaN/Inf fields.
/// - [`DataError::NonMonotonic`] when timestamps are not strictly increasing.
/// - [`DataError::CorruptData`] for OHLC ordering, negative volume or close-time violations.
pub fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::EmptyData);
    }

    for (i, bar) in bars.iter().enumerate() {
        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
            ("volume", bar.volume),
        ] {
            if !value.is_finite() {
                return Err(DataError::NonFinite {
                    index: i,
                    field,
                    value,
                });
            }
        }

        if bar.volume < 0.0 {
            return Err(DataError::CorruptData(format!(
                "Negative volume at index {i}: {}",
                bar.volume
            )));
        }

        if bar.low > bar.open
            || bar.low > bar.close
            || bar.high < bar.open
            || bar.high < bar.close
            || bar.low > bar.high
        {
            return Err(DataError::CorruptData(format!(
                "Invalid OHLC at index {i}: low={}, high={}, open={}, close={}",
                bar.low, bar.high, bar.open, bar.close
            )));
        }

        if bar.close_time_ns < bar.timestamp_ns {
            return Err(DataError::CorruptData(format!(
                "Close time before open at index {i}: close_time_ns={} < timestamp_ns={}",
                bar.close_time_ns, bar.timestamp_ns
            )));
        }

        if i > 0 && bar.timestamp_ns <= bars[i - 1].timestamp_ns {
            return Err(DataError::NonMonotonic {
                index: i,
                previous: bars[i - 1].timestamp_ns,
                current: bar.timestamp_ns,
            });
        }
    }

    Ok(())
}

/// Validates a table. See [`validate_bars`].
///
/// A table tagged with a timeframe additionally requires every close time to
/// be either unset (equal to the open time) or `open + duration - 1`.
///
/// # Errors
/// Same as [`validate_bars`], plus [`DataError::CorruptData`] for a close time
/// that contradicts the table's timeframe.
pub fn validate_table(table: &OhlcvTable) -> Result<(), DataError> {
    validate_bars(&table.bars)?;

    if let Some(tf) = table.timeframe {
        let span = tf.to_nanos() - 1;
        for (i, bar) in table.bars.iter().enumerate() {
            let expected = bar.timestamp_ns.saturating_add(span);
            if bar.close_time_ns != bar.timestamp_ns && bar.close_time_ns != expected {
                return Err(DataError::CorruptData(format!(
                    "Close time inconsistent with {tf} at index {i}: close_time_ns={}, expected {expected}",
                    bar.close_time_ns
                )));
            }
        }
    }
    Ok(())
}

/// Checks that an externally supplied series has one value per table row.
///
/// # Errors
/// Returns [`DataError::LengthMismatch`] on a length difference.
pub fn validate_series_length(name: &str, series: &[f64], rows: usize) -> Result<(), DataError> {
    if series.len() != rows {
        return Err(DataError::LengthMismatch {
            name: name.to_string(),
            expected: rows,
            actual: series.len(),
        });
    }
    Ok(())
}
