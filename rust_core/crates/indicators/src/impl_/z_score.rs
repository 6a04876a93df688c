//! Z-Score indicator

use crate::traits::Indicator;
use theta_types::Bar;

/// Z-Score indicator
///
/// Calculates the standardized score: (close - mean) / std over a rolling
/// window with sample std (ddof=1). Windows whose variance is at or below
/// `variance_epsilon` yield NaN.
#[derive(Debug, Clone)]
pub struct ZScore {
    /// Window size for mean and standard deviation
    pub window: usize,
    /// Variance floor below which the score is undefined
    pub variance_epsilon: f64,
}

impl ZScore {
    /// Creates a new Z-Score indicator with the given window.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            variance_epsilon: 0.0,
        }
    }

    /// Sets the variance floor.
    #[must_use]
    pub fn with_variance_epsilon(mut self, variance_epsilon: f64) -> Self {
        self.variance_epsilon = variance_epsilon;
        self
    }
}

/// Rolling z-score of an arbitrary series; windows with a non-finite value are NaN.
#[must_use]
pub fn zscore_of(values: &[f64], window: usize, variance_epsilon: f64) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];
    if window < 2 || len < window {
        return result;
    }

    for i in (window - 1)..len {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        if variance > variance_epsilon && variance > 0.0 {
            result[i] = (values[i] - mean) / variance.sqrt();
        }
    }
    result
}

impl Indicator for ZScore {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        zscore_of(&closes, self.window, self.variance_epsilon)
    }

    fn name(&self) -> &str {
        "Z_SCORE"
    }

    fn warmup_periods(&self) -> usize {
        self.window
    }
}
