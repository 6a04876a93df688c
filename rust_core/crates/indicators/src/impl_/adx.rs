//! Directional Movement Index (+DI / -DI) and ADX with Wilder smoothing.

use crate::impl_::atr::true_range;
use crate::series::wilder_of;
use crate::traits::{IntoMultiVecs, MultiOutputIndicator};
use theta_types::Bar;

/// DMI/ADX outputs.
#[derive(Debug, Clone)]
pub struct AdxResult {
    /// +DI on 0..100
    pub plus_di: Vec<f64>,
    /// -DI on 0..100
    pub minus_di: Vec<f64>,
    /// ADX on 0..100
    pub adx: Vec<f64>,
    /// sign(+DI - -DI) in {-1, 0, 1}
    pub direction: Vec<f64>,
}

impl IntoMultiVecs for AdxResult {
    fn into_vecs(self) -> Vec<Vec<f64>> {
        vec![self.plus_di, self.minus_di, self.adx, self.direction]
    }
}

/// Average Directional Index.
///
/// DI values start at index `period`, ADX at `2 * period - 1`.
#[derive(Debug, Clone)]
pub struct ADX {
    /// Wilder smoothing period
    pub period: usize,
}

impl ADX {
    /// Creates a new ADX indicator.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl MultiOutputIndicator for ADX {
    type Output = AdxResult;

    fn compute_all(&self, bars: &[Bar]) -> Self::Output {
        let len = bars.len();
        let mut plus_dm = vec![f64::NAN; len];
        let mut minus_dm = vec![f64::NAN; len];
        let mut tr = true_range(bars);
        if let Some(first) = tr.first_mut() {
            *first = f64::NAN;
        }

        for i in 1..len {
            let up_move = bars[i].high - bars[i - 1].high;
            let down_move = bars[i - 1].low - bars[i].low;
            plus_dm[i] = if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            };
            minus_dm[i] = if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            };
        }

        let sm_tr = wilder_of(&tr, self.period);
        let sm_plus = wilder_of(&plus_dm, self.period);
        let sm_minus = wilder_of(&minus_dm, self.period);

        let mut plus_di = vec![f64::NAN; len];
        let mut minus_di = vec![f64::NAN; len];
        let mut direction = vec![f64::NAN; len];
        let mut dx = vec![f64::NAN; len];
        for i in 0..len {
            if sm_tr[i].is_nan() || sm_tr[i] <= 0.0 {
                continue;
            }
            let p = 100.0 * sm_plus[i] / sm_tr[i];
            let m = 100.0 * sm_minus[i] / sm_tr[i];
            plus_di[i] = p;
            minus_di[i] = m;
            direction[i] = sign(p - m);
            if p + m > 0.0 {
                dx[i] = 100.0 * (p - m).abs() / (p + m);
            }
        }

        AdxResult {
            plus_di,
            minus_di,
            adx: wilder_of(&dx, self.period),
            direction,
        }
    }

    fn name(&self) -> &str {
        "ADX"
    }

    fn warmup_periods(&self) -> usize {
        2 * self.period
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["plus_di", "minus_di", "adx", "direction"]
    }
}

/// Sign as -1.0 / 0.0 / 1.0; NaN stays NaN.
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else if value == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_bars(n: usize, step: f64) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let mid = 100.0 + step * i as f64;
                Bar::new(0, mid, mid + 1.0, mid - 1.0, mid, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_uptrend_has_positive_direction() {
        let result = ADX::new(5).compute_all(&trending_bars(30, 0.5));

        assert!(result.plus_di[4].is_nan());
        assert!(result.plus_di[5].is_finite());
        assert!(result.adx[8].is_nan());
        assert!(result.adx[9].is_finite());
        assert_eq!(result.direction[20], 1.0);
        assert!(result.minus_di[20].abs() < 1e-10);
        assert!((result.adx[29] - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_downtrend_has_negative_direction() {
        let result = ADX::new(5).compute_all(&trending_bars(30, -0.5));
        assert_eq!(result.direction[25], -1.0);
    }

    #[test]
    fn test_bounds() {
        let bars: Vec<Bar> = (0..80)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.3).sin() * 5.0;
                Bar::new(0, mid, mid + 0.7, mid - 0.4, mid + 0.1, 0.0)
            })
            .collect();
        let result = ADX::new(14).compute_all(&bars);
        for v in result.adx.iter().chain(&result.plus_di).filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(2.0), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert!(sign(f64::NAN).is_nan());
    }
}
