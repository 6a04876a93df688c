//! On-Balance Volume (OBV)

use crate::traits::Indicator;
use theta_types::Bar;

/// Cumulative volume signed by the direction of the close.
#[derive(Debug, Clone, Default)]
pub struct OBV;

impl Indicator for OBV {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut result = Vec::with_capacity(bars.len());
        let mut total = 0.0;
        for (i, bar) in bars.iter().enumerate() {
            if i > 0 {
                let prev = bars[i - 1].close;
                if bar.close > prev {
                    total += bar.volume;
                } else if bar.close < prev {
                    total -= bar.volume;
                }
            }
            result.push(total);
        }
        result
    }

    fn name(&self) -> &str {
        "OBV"
    }

    fn warmup_periods(&self) -> usize {
        1
    }
}
