//! Range-normalized variance (unsupervised).

use super::{MethodScores, ScoringContext, ScoringMethod};
use crate::stats::{SPREAD_EPS, finite, min_max, variance};
use theta_types::SelectionMethod;

/// Scores a column by `var(x) / range(x)^2`, which lies in (0, 0.25].
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeVarianceScorer;

/// Range-normalized population variance over finite values.
///
/// # Errors
/// Fails with fewer than two finite values or a zero range.
pub fn range_normalized_variance(values: &[f64]) -> Result<f64, String> {
    let values = finite(values);
    if values.len() < 2 {
        return Err("fewer than two finite values".to_string());
    }
    let (lo, hi) = min_max(&values);
    let range = hi - lo;
    if range <= SPREAD_EPS {
        return Err("zero range".to_string());
    }
    Ok(variance(&values) / (range * range))
}

impl ScoringMethod for RangeVarianceScorer {
    fn method(&self) -> SelectionMethod {
        SelectionMethod::Variance
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> MethodScores {
        ctx.columns
            .iter()
            .map(|column| range_normalized_variance(column))
            .collect()
    }
}
