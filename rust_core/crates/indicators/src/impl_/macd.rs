//! Moving Average Convergence/Divergence (MACD)

use crate::series::ema_of;
use crate::error::IndicatorError;
use crate::traits::{IntoMultiVecs, MultiOutputIndicator};
use theta_types::Bar;

/// MACD line, signal line and histogram.
#[derive(Debug, Clone)]
pub struct MacdResult {
    /// EMA(fast) - EMA(slow)
    pub line: Vec<f64>,
    /// EMA(signal) of the line
    pub signal: Vec<f64>,
    /// line - signal
    pub histogram: Vec<f64>,
}

impl IntoMultiVecs for MacdResult {
    fn into_vecs(self) -> Vec<Vec<f64>> {
        vec![self.line, self.signal, self.histogram]
    }
}

/// MACD over closes.
#[derive(Debug, Clone)]
pub struct MACD {
    /// Fast EMA period
    pub fast: usize,
    /// Slow EMA period
    pub slow: usize,
    /// Signal EMA period
    pub signal: usize,
}

impl MACD {
    /// Creates a new MACD.
    #[must_use]
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }
}

impl MultiOutputIndicator for MACD {
    type Output = MacdResult;

    fn compute_all(&self, bars: &[Bar]) -> Self::Output {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of(&closes, self.fast);
        let slow = ema_of(&closes, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of(&line, self.signal);
        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        MacdResult {
            line,
            signal,
            histogram,
        }
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn warmup_periods(&self) -> usize {
        if self.slow == 0 || self.signal == 0 {
            0
        } else {
            self.slow + self.signal - 1
        }
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["line", "signal", "histogram"]
    }

    fn validate(&self, len: usize) -> Result<(), IndicatorError> {
        if self.fast == 0 || self.fast >= self.slow {
            return Err(IndicatorError::invalid_params(format!(
                "MACD: fast period {} must be positive and below slow period {}",
                self.fast, self.slow
            )));
        }
        let required = self.warmup_periods();
        if required == 0 {
            return Err(IndicatorError::invalid_params("MACD: signal period must be greater than 0"));
        }
        if len < required {
            return Err(IndicatorError::InsufficientData {
                required,
                actual: len,
            });
        }
        Ok(())
    }
}
