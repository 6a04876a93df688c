//! Volume-Weighted Average Price (VWAP)

use crate::traits::Indicator;
use theta_types::Bar;

/// VWAP of the typical price.
///
/// `window = None` accumulates from the first bar (no session resets);
/// `Some(n)` uses the trailing `n` bars. Zero traded volume yields NaN.
#[derive(Debug, Clone)]
pub struct VWAP {
    /// Rolling window, or cumulative when `None`
    pub window: Option<usize>,
}

impl VWAP {
    /// Cumulative VWAP.
    #[must_use]
    pub fn cumulative() -> Self {
        Self { window: None }
    }

    /// Rolling VWAP over `window` bars.
    #[must_use]
    pub fn rolling(window: usize) -> Self {
        Self {
            window: Some(window),
        }
    }
}

impl Indicator for VWAP {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let len = bars.len();
        let mut result = vec![f64::NAN; len];
        if self.window == Some(0) {
            return result;
        }

        let mut pv = 0.0;
        let mut vol = 0.0;
        for i in 0..len {
            pv += bars[i].typical_price() * bars[i].volume;
            vol += bars[i].volume;
            if let Some(w) = self.window {
                if i >= w {
                    let old = &bars[i - w];
                    pv -= old.typical_price() * old.volume;
                    vol -= old.volume;
                }
                if i + 1 < w {
                    continue;
                }
            }
            if vol > 0.0 {
                result[i] = pv / vol;
            }
        }
        result
    }

    fn name(&self) -> &str {
        "VWAP"
    }

    fn warmup_periods(&self) -> usize {
        self.window.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(price: f64, volume: f64) -> Bar {
        Bar::new(0, price, price, price, price, volume)
    }

    #[test]
    fn test_cumulative_vwap() {
        let bars = vec![make_bar(10.0, 1.0), make_bar(20.0, 3.0)];
        let result = VWAP::cumulative().compute(&bars);
        assert!((result[0] - 10.0).abs() < 1e-10);
        assert!((result[1] - 17.5).abs() < 1e-10);
    }

    #[test]
    fn test_rolling_vwap_drops_old_bars() {
        let bars = vec![make_bar(10.0, 1.0), make_bar(20.0, 1.0), make_bar(30.0, 1.0)];
        let result = VWAP::rolling(2).compute(&bars);
        assert!(result[0].is_nan());
        assert!((result[1] - 15.0).abs() < 1e-10);
        assert!((result[2] - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_volume_is_nan() {
        let bars = vec![make_bar(10.0, 0.0), make_bar(11.0, 0.0)];
        assert!(VWAP::cumulative().compute(&bars).iter().all(|v| v.is_nan()));
    }
}
