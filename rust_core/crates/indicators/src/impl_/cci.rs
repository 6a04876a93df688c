//! Commodity Channel Index (CCI)

use crate::series::sma_of;
use crate::traits::Indicator;
use theta_types::Bar;

/// Lambert's scaling constant.
pub const CCI_CONSTANT: f64 = 0.015;

/// CCI = (TP - SMA(TP)) / (0.015 * mean absolute deviation of TP).
#[derive(Debug, Clone)]
pub struct CCI {
    /// Window length
    pub period: usize,
}

impl CCI {
    /// Creates a new CCI indicator.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for CCI {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let tp: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
        let mean = sma_of(&tp, self.period);
        let mut result = vec![f64::NAN; bars.len()];

        for i in 0..bars.len() {
            if !mean[i].is_finite() {
                continue;
            }
            let window = &tp[i + 1 - self.period..=i];
            let mad = window.iter().map(|v| (v - mean[i]).abs()).sum::<f64>() / self.period as f64;
            if mad > 0.0 {
                result[i] = (tp[i] - mean[i]) / (CCI_CONSTANT * mad);
            }
        }
        result
    }

    fn name(&self) -> &str {
        "CCI"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}
