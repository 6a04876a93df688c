//! Average True Range (ATR) indicator with Wilder smoothing

use crate::series::wilder_of;
use crate::traits::Indicator;
use theta_types::Bar;

/// Average True Range (Wilder)
///
/// ATR = (prev_ATR * (n-1) + TR) / n, seeded with the mean of the first n TRs.
#[derive(Debug, Clone)]
pub struct ATR {
    /// Number of periods for ATR calculation
    pub period: usize,
}

impl ATR {
    /// Creates a new ATR indicator with the given period.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// True Range series. The first bar has no previous close, so its TR is H-L.
///
/// TR = max(High - Low, |High - Prev_Close|, |Low - Prev_Close|)
#[must_use]
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            if i == 0 {
                return hl;
            }
            let prev_close = bars[i - 1].close;
            hl.max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        })
        .collect()
}

impl Indicator for ATR {
    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        wilder_of(&true_range(bars), self.period)
    }

    fn name(&self) -> &str {
        "ATR"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar_ohlc(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(0, open, high, low, close, 0.0)
    }

    #[test]
    fn test_true_range_gaps() {
        let bars = vec![
            make_bar_ohlc(100.0, 102.0, 98.0, 100.0),
            make_bar_ohlc(110.0, 115.0, 108.0, 112.0), // gap up: H - prev_close = 15
            make_bar_ohlc(90.0, 92.0, 85.0, 88.0),     // gap down: prev_close - L = 27
        ];
        let tr = true_range(&bars);
        assert!((tr[0] - 4.0).abs() < 1e-10);
        assert!((tr[1] - 15.0).abs() < 1e-10);
        assert!((tr[2] - 27.0).abs() < 1e-10);
    }

    #[test]
    fn test_atr_basic() {
        let bars = vec![
            make_bar_ohlc(100.0, 102.0, 98.0, 101.0),  // TR = 4
            make_bar_ohlc(101.0, 104.0, 99.0, 103.0),  // TR = 5
            make_bar_ohlc(103.0, 106.0, 101.0, 105.0), // TR = 5
            make_bar_ohlc(105.0, 108.0, 103.0, 107.0), // TR = 5
        ];

        let result = ATR::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 4.666_666_666_7).abs() < 1e-8);
        assert!((result[3] - 4.777_777_777_8).abs() < 1e-8);
    }

    #[test]
    fn test_atr_insufficient_data() {
        let bars = vec![
            make_bar_ohlc(100.0, 102.0, 98.0, 101.0),
            make_bar_ohlc(101.0, 104.0, 99.0, 103.0),
        ];
        assert!(ATR::new(5).compute(&bars).iter().all(|v| v.is_nan()));
    }
}
