//! Stochastic oscillator (%K / %D)

use crate::series::sma_of;
use crate::traits::{IntoMultiVecs, MultiOutputIndicator};
use theta_types::Bar;

/// %K and %D series on 0..100.
#[derive(Debug, Clone)]
pub struct StochasticResult {
    /// Position of close in the `k_period` high/low range
    pub k: Vec<f64>,
    /// SMA of %K over `d_period`
    pub d: Vec<f64>,
}

impl IntoMultiVecs for StochasticResult {
    fn into_vecs(self) -> Vec<Vec<f64>> {
        vec![self.k, self.d]
    }
}

/// Fast stochastic oscillator. A flat high/low window yields NaN.
#[derive(Debug, Clone)]
pub struct Stochastic {
    /// Lookback for the high/low range
    pub k_period: usize,
    /// Smoothing of %K
    pub d_period: usize,
}

impl Stochastic {
    /// Creates a new stochastic oscillator.
    #[must_use]
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }
}

/// Raw %K for a single period; shared with composite signals.
#[must_use]
pub fn stochastic_k(bars: &[Bar], period: usize) -> Vec<f64> {
    let len = bars.len();
    let mut k = vec![f64::NAN; len];
    if period == 0 || len < period {
        return k;
    }
    for i in (period - 1)..len {
        let window = &bars[i + 1 - period..=i];
        let hh = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let ll = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let range = hh - ll;
        if range > 0.0 {
            k[i] = 100.0 * (bars[i].close - ll) / range;
        }
    }
    k
}

impl MultiOutputIndicator for Stochastic {
    type Output = StochasticResult;

    fn compute_all(&self, bars: &[Bar]) -> Self::Output {
        let k = stochastic_k(bars, self.k_period);
        let d = sma_of(&k, self.d_period);
        StochasticResult { k, d }
    }

    fn name(&self) -> &str {
        "STOCH"
    }

    fn warmup_periods(&self) -> usize {
        if self.k_period == 0 || self.d_period == 0 {
            0
        } else {
            self.k_period + self.d_period - 1
        }
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["k", "d"]
    }
}
