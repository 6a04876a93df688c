//! Rate of Change (ROC) indicator

use crate::series::roc_of;
use crate::traits::Indicator;
use theta_types::Bar;

/// Percent change of close over `period` bars.
#[derive(Debug, Clone)]
pub struct ROC {
    /// Lookback in bars
    pub period: usize,
}

impl ROC {
    /// Creates a new ROC indicator.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for ROC {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        roc_of(&closes, self.period)
    }

    fn name(&self) -> &str {
        "ROC"
    }

    fn warmup_periods(&self) -> usize {
        if self.period == 0 {
            0
        } else {
            self.period + 1
        }
    }
}
