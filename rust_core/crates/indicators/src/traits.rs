//! Indicator traits.
//!
//! Every indicator computes a full series aligned 1:1 with the input bars.
//! Rows inside the warmup window are `f64::NAN`.

use crate::error::IndicatorError;
use theta_types::Bar;

/// Trait for single-output indicators.
pub trait Indicator: Send + Sync {
    /// Computes the indicator for all bars.
    ///
    /// Returns `Vec<f64>` with the same length as `bars`.
    /// Values at indices < `warmup_periods() - 1` are `f64::NAN`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;

    /// Name of the indicator (e.g., "EMA", "ATR").
    fn name(&self) -> &str;

    /// Minimum number of bars required for a first valid value.
    fn warmup_periods(&self) -> usize;

    /// Checks that the indicator can produce at least one value over `len` rows.
    ///
    /// # Errors
    /// - [`IndicatorError::InvalidParams`] when the window is zero.
    /// - [`IndicatorError::InsufficientData`] when `len` is below the warmup.
    fn validate(&self, len: usize) -> Result<(), IndicatorError> {
        check_window(self.name(), self.warmup_periods(), len)
    }
}

/// Trait for multi-output indicators like Bollinger Bands.
///
/// These indicators produce multiple series (e.g., upper, middle, lower bands)
/// that are computed together.
pub trait MultiOutputIndicator: Send + Sync {
    /// Type of the output structure
    type Output: IntoMultiVecs;

    /// Computes all outputs at once.
    fn compute_all(&self, bars: &[Bar]) -> Self::Output;

    /// Name of the indicator.
    fn name(&self) -> &str;

    /// Minimum number of bars for a first valid value.
    fn warmup_periods(&self) -> usize;

    /// Output names, in the order of [`IntoMultiVecs::into_vecs`].
    fn output_names(&self) -> &'static [&'static str];

    /// See [`Indicator::validate`].
    ///
    /// # Errors
    /// Same as [`Indicator::validate`].
    fn validate(&self, len: usize) -> Result<(), IndicatorError> {
        check_window(self.name(), self.warmup_periods(), len)
    }
}

/// Trait for converting multi-output results into a vector of vectors.
pub trait IntoMultiVecs {
    /// Converts the output structure into a vector of value vectors.
    fn into_vecs(self) -> Vec<Vec<f64>>;
}

fn check_window(name: &str, required: usize, len: usize) -> Result<(), IndicatorError> {
    if required == 0 {
        return Err(IndicatorError::invalid_params(format!(
            "{name}: window must be greater than 0"
        )));
    }
    if len < required {
        return Err(IndicatorError::InsufficientData {
            required,
            actual: len,
        });
    }
    Ok(())
}
