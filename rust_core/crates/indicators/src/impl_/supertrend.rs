//! SuperTrend

use crate::impl_::atr::ATR;
use crate::traits::{Indicator, IntoMultiVecs, MultiOutputIndicator};
use theta_types::Bar;

/// SuperTrend line and direction (+1 above / -1 below the line).
#[derive(Debug, Clone)]
pub struct SuperTrendResult {
    /// Active band: lower band in an uptrend, upper band in a downtrend
    pub line: Vec<f64>,
    /// Trend direction
    pub direction: Vec<f64>,
}

impl IntoMultiVecs for SuperTrendResult {
    fn into_vecs(self) -> Vec<Vec<f64>> {
        vec![self.line, self.direction]
    }
}

/// ATR-band trend follower around the bar midpoint.
#[derive(Debug, Clone)]
pub struct SuperTrend {
    /// ATR period
    pub period: usize,
    /// ATR multiplier for the bands
    pub multiplier: f64,
}

impl SuperTrend {
    /// Creates a new SuperTrend.
    #[must_use]
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self { period, multiplier }
    }
}

impl MultiOutputIndicator for SuperTrend {
    type Output = SuperTrendResult;

    fn compute_all(&self, bars: &[Bar]) -> Self::Output {
        let len = bars.len();
        let atr = ATR::new(self.period).compute(bars);
        let mut line = vec![f64::NAN; len];
        let mut direction = vec![f64::NAN; len];

        let Some(start) = atr.iter().position(|v| v.is_finite()) else {
            return SuperTrendResult { line, direction };
        };

        let mut upper = f64::NAN;
        let mut lower = f64::NAN;
        let mut dir = 0.0;
        for i in start..len {
            let mid = (bars[i].high + bars[i].low) / 2.0;
            let basic_upper = mid + self.multiplier * atr[i];
            let basic_lower = mid - self.multiplier * atr[i];

            if i == start {
                upper = basic_upper;
                lower = basic_lower;
                dir = if bars[i].close >= mid { 1.0 } else { -1.0 };
            } else {
                let prev_close = bars[i - 1].close;
                if basic_upper < upper || prev_close > upper {
                    upper = basic_upper;
                }
                if basic_lower > lower || prev_close < lower {
                    lower = basic_lower;
                }
                if dir < 0.0 && bars[i].close > upper {
                    dir = 1.0;
                } else if dir > 0.0 && bars[i].close < lower {
                    dir = -1.0;
                }
            }

            line[i] = if dir > 0.0 { lower } else { upper };
            direction[i] = dir;
        }

        SuperTrendResult { line, direction }
    }

    fn name(&self) -> &str {
        "SUPERTREND"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["line", "direction"]
    }
}
