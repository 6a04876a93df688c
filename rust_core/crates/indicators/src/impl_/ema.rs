//! Exponential Moving Average (EMA) indicator

use crate::series::ema_of;
use crate::traits::Indicator;
use theta_types::Bar;

/// Exponential Moving Average
///
/// Multiplier = 2 / (period + 1), seeded with the SMA of the first `period`
/// closes so the warmup rows stay NaN.
#[derive(Debug, Clone)]
pub struct EMA {
    /// Number of periods for the EMA
    pub period: usize,
}

impl EMA {
    /// Creates a new EMA indicator with the given period.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for EMA {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of(&closes, self.period)
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
