//! Parabolic SAR

use crate::error::IndicatorError;
use crate::traits::{IntoMultiVecs, MultiOutputIndicator};
use theta_types::Bar;

/// SAR value and trend direction (+1 long, -1 short).
#[derive(Debug, Clone)]
pub struct PsarResult {
    /// Stop-and-reverse level
    pub sar: Vec<f64>,
    /// Trend direction
    pub direction: Vec<f64>,
}

impl IntoMultiVecs for PsarResult {
    fn into_vecs(self) -> Vec<Vec<f64>> {
        vec![self.sar, self.direction]
    }
}

/// Wilder's Parabolic SAR.
#[derive(Debug, Clone)]
pub struct ParabolicSar {
    /// Acceleration factor increment
    pub step: f64,
    /// Acceleration factor cap
    pub max_step: f64,
}

impl ParabolicSar {
    /// Creates a new Parabolic SAR.
    #[must_use]
    pub fn new(step: f64, max_step: f64) -> Self {
        Self { step, max_step }
    }
}

impl MultiOutputIndicator for ParabolicSar {
    type Output = PsarResult;

    fn compute_all(&self, bars: &[Bar]) -> Self::Output {
        let len = bars.len();
        let mut sar_out = vec![f64::NAN; len];
        let mut dir_out = vec![f64::NAN; len];
        if len < 2 {
            return PsarResult {
                sar: sar_out,
                direction: dir_out,
            };
        }

        let mut long = bars[1].close >= bars[0].close;
        let (mut sar, mut ep) = if long {
            (bars[0].low.min(bars[1].low), bars[0].high.max(bars[1].high))
        } else {
            (bars[0].high.max(bars[1].high), bars[0].low.min(bars[1].low))
        };
        let mut af = self.step;
        sar_out[1] = sar;
        dir_out[1] = if long { 1.0 } else { -1.0 };

        for i in 2..len {
            let bar = &bars[i];
            let mut next = sar + af * (ep - sar);
            if long {
                next = next.min(bars[i - 1].low).min(bars[i - 2].low);
                if bar.low < next {
                    long = false;
                    next = ep;
                    ep = bar.low;
                    af = self.step;
                } else if bar.high > ep {
                    ep = bar.high;
                    af = (af + self.step).min(self.max_step);
                }
            } else {
                next = next.max(bars[i - 1].high).max(bars[i - 2].high);
                if bar.high > next {
                    long = true;
                    next = ep;
                    ep = bar.high;
                    af = self.step;
                } else if bar.low < ep {
                    ep = bar.low;
                    af = (af + self.step).min(self.max_step);
                }
            }
            sar = next;
            sar_out[i] = sar;
            dir_out[i] = if long { 1.0 } else { -1.0 };
        }

        PsarResult {
            sar: sar_out,
            direction: dir_out,
        }
    }

    fn name(&self) -> &str {
        "PSAR"
    }

    fn warmup_periods(&self) -> usize {
        2
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["sar", "direction"]
    }

    fn validate(&self, len: usize) -> Result<(), IndicatorError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(IndicatorError::param_out_of_range("step", self.step, 0.0, 1.0));
        }
        if !(self.max_step.is_finite() && self.max_step >= self.step) {
            return Err(IndicatorError::param_out_of_range(
                "max_step",
                self.max_step,
                self.step,
                1.0,
            ));
        }
        if len < 2 {
            return Err(IndicatorError::InsufficientData {
                required: 2,
                actual: len,
            });
        }
        Ok(())
    }
}
