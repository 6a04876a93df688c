//! Bollinger Bands indicator

use crate::traits::{IntoMultiVecs, MultiOutputIndicator};
use theta_types::Bar;

/// Bollinger Bands result containing upper, middle, lower bands and width.
#[derive(Debug, Clone)]
pub struct BollingerResult {
    /// Upper band = SMA + std_factor * std
    pub upper: Vec<f64>,
    /// Middle band = SMA
    pub middle: Vec<f64>,
    /// Lower band = SMA - std_factor * std
    pub lower: Vec<f64>,
    /// (upper - lower) / middle, NaN when the middle band is zero
    pub width: Vec<f64>,
}

impl IntoMultiVecs for BollingerResult {
    fn into_vecs(self) -> Vec<Vec<f64>> {
        vec![self.upper, self.middle, self.lower, self.width]
    }
}

/// Bollinger Bands
///
/// Uses population standard deviation (n), not sample (n-1).
#[derive(Debug, Clone)]
pub struct BollingerBands {
    /// Period for the SMA and standard deviation
    pub period: usize,
    /// Multiplier for standard deviation (typically 2.0)
    pub std_factor: f64,
}

impl BollingerBands {
    /// Creates new Bollinger Bands with the given parameters.
    #[must_use]
    pub fn new(period: usize, std_factor: f64) -> Self {
        Self { period, std_factor }
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Output = BollingerResult;

    fn compute_all(&self, bars: &[Bar]) -> Self::Output {
        let len = bars.len();
        let mut upper = vec![f64::NAN; len];
        let mut middle = vec![f64::NAN; len];
        let mut lower = vec![f64::NAN; len];
        let mut width = vec![f64::NAN; len];

        if len >= self.period && self.period > 0 {
            let n = self.period as f64;
            for i in (self.period - 1)..len {
                let window = &bars[i + 1 - self.period..=i];
                let sma = window.iter().map(|b| b.close).sum::<f64>() / n;
                let variance = window.iter().map(|b| (b.close - sma).powi(2)).sum::<f64>() / n;
                let band = self.std_factor * variance.sqrt();

                middle[i] = sma;
                upper[i] = sma + band;
                lower[i] = sma - band;
                if sma != 0.0 {
                    width[i] = (upper[i] - lower[i]) / sma;
                }
            }
        }

        BollingerResult {
            upper,
            middle,
            lower,
            width,
        }
    }

    fn name(&self) -> &str {
        "BOLLINGER"
    }

    fn warmup_periods(&self) -> usize {
        self.period
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["upper", "middle", "lower", "width"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(close: f64) -> Bar {
        Bar::new(0, close, close, close, close, 0.0)
    }

    #[test]
    fn test_bollinger_basic() {
        let bars: Vec<Bar> = vec![1.0, 2.0, 3.0, 4.0, 5.0]
            .into_iter()
            .map(make_bar)
            .collect();

        let result = BollingerBands::new(3, 2.0).compute_all(&bars);

        assert!(result.middle[1].is_nan());

        // window = [1, 2, 3]: SMA = 2, population std = sqrt(2/3)
        let expected_std = (2.0_f64 / 3.0).sqrt();
        assert!((result.middle[2] - 2.0).abs() < 1e-10);
        assert!((result.upper[2] - (2.0 + 2.0 * expected_std)).abs() < 1e-10);
        assert!((result.lower[2] - (2.0 - 2.0 * expected_std)).abs() < 1e-10);
        assert!((result.width[2] - 4.0 * expected_std / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_bollinger_constant_input_has_zero_width() {
        let bars: Vec<Bar> = vec![100.0; 10].into_iter().map(make_bar).collect();
        let result = BollingerBands::new(5, 2.0).compute_all(&bars);

        for i in 4..10 {
            assert!((result.upper[i] - 100.0).abs() < 1e-10);
            assert!((result.lower[i] - 100.0).abs() < 1e-10);
            assert!(result.width[i].abs() < 1e-12);
        }
    }

    #[test]
    fn test_bollinger_zero_middle_width_is_nan() {
        let bars: Vec<Bar> = vec![-1.0, 1.0, -1.0, 1.0]
            .into_iter()
            .map(make_bar)
            .collect();
        let result = BollingerBands::new(2, 2.0).compute_all(&bars);
        assert!(result.width[1].is_nan());
        assert!(result.upper[1].is_finite());
    }

    #[test]
    fn test_output_order_matches_names() {
        let bb = BollingerBands::new(2, 1.0);
        let vecs = bb.compute_all(&[make_bar(1.0), make_bar(3.0)]).into_vecs();
        assert_eq!(vecs.len(), bb.output_names().len());
        assert!((vecs[1][1] - 2.0).abs() < 1e-10);
    }
}
