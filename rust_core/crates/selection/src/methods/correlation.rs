//! Absolute Pearson correlation against the target.

use super::{MethodScores, ScoringContext, ScoringMethod};
use crate::stats::{SPREAD_EPS, mean, paired_finite};
use rayon::prelude::*;
use theta_types::SelectionMethod;

/// Scores a column by |r| over pairwise-finite rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationScorer;

/// |Pearson r| of two series over their pairwise-finite rows.
///
/// # Errors
/// Fails with fewer than `min_samples` pairs or zero variance on either side.
pub fn abs_correlation(x: &[f64], y: &[f64], min_samples: usize) -> Result<f64, String> {
    let (xs, ys) = paired_finite(x, y);
    if xs.len() < min_samples.max(2) {
        return Err(format!(
            "only {} paired finite samples, need {}",
            xs.len(),
            min_samples.max(2)
        ));
    }

    let (mx, my) = (mean(&xs), mean(&ys));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in xs.iter().zip(&ys) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= SPREAD_EPS || syy <= SPREAD_EPS {
        return Err("zero variance after cleaning".to_string());
    }
    Ok((sxy / (sxx * syy).sqrt()).abs().min(1.0))
}

impl ScoringMethod for CorrelationScorer {
    fn method(&self) -> SelectionMethod {
        SelectionMethod::Correlation
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> MethodScores {
        ctx.columns
            .par_iter()
            .map(|column| abs_correlation(column, ctx.target, ctx.min_samples))
            .collect()
    }
}
