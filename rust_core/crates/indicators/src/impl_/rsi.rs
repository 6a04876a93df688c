//! Relative Strength Index (RSI) with Wilder smoothing

use crate::series::rsi_of;
use crate::traits::Indicator;
use theta_types::Bar;

/// Relative Strength Index on 0..100.
#[derive(Debug, Clone)]
pub struct RSI {
    /// Smoothing period
    pub period: usize,
}

impl RSI {
    /// Creates a new RSI indicator with the given period.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for RSI {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        rsi_of(&closes, self.period)
    }

    fn name(&self) -> &str {
        "RSI"
    }

    // One extra bar: the first change needs a previous close.
    fn warmup_periods(&self) -> usize {
        if self.period == 0 {
            0
        } else {
            self.period + 1
        }
    }
}
