//! Histogram mutual information against the target.

use super::{MethodScores, ScoringContext, ScoringMethod};
use crate::stats::{SPREAD_EPS, min_max, paired_finite};
use rayon::prelude::*;
use theta_types::SelectionMethod;

/// Equal-width histogram estimate of I(X; Y) in nats.
#[derive(Debug, Clone, Copy)]
pub struct MutualInfoScorer {
    bins: usize,
}

impl MutualInfoScorer {
    /// Creates a scorer with `bins` buckets per axis.
    #[must_use]
    pub fn new(bins: usize) -> Self {
        Self { bins: bins.max(2) }
    }
}

fn bin_index(value: f64, lo: f64, width: f64, bins: usize) -> usize {
    let raw = ((value - lo) / width).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(bins - 1)
    }
}

/// Mutual information of two series over their pairwise-finite rows.
///
/// # Errors
/// Fails with fewer than `min_samples` pairs or a zero range on either side.
pub fn mutual_information(
    x: &[f64],
    y: &[f64],
    bins: usize,
    min_samples: usize,
) -> Result<f64, String> {
    let (xs, ys) = paired_finite(x, y);
    let n = xs.len();
    if n < min_samples.max(2) {
        return Err(format!(
            "only {n} paired finite samples, need {}",
            min_samples.max(2)
        ));
    }

    let (x_lo, x_hi) = min_max(&xs);
    let (y_lo, y_hi) = min_max(&ys);
    if x_hi - x_lo <= SPREAD_EPS || y_hi - y_lo <= SPREAD_EPS {
        return Err("zero range after cleaning".to_string());
    }
    let x_width = (x_hi - x_lo) / bins as f64;
    let y_width = (y_hi - y_lo) / bins as f64;

    let mut joint = vec![0usize; bins * bins];
    let mut px = vec![0usize; bins];
    let mut py = vec![0usize; bins];
    for (a, b) in xs.iter().zip(&ys) {
        let i = bin_index(*a, x_lo, x_width, bins);
        let j = bin_index(*b, y_lo, y_width, bins);
        joint[i * bins + j] += 1;
        px[i] += 1;
        py[j] += 1;
    }

    let total = n as f64;
    let mut mi = 0.0;
    for i in 0..bins {
        for j in 0..bins {
            let count = joint[i * bins + j];
            if count == 0 {
                continue;
            }
            let pxy = count as f64 / total;
            let marginal = (px[i] as f64 / total) * (py[j] as f64 / total);
            mi += pxy * (pxy / marginal).ln();
        }
    }
    Ok(mi.max(0.0))
}

impl ScoringMethod for MutualInfoScorer {
    fn method(&self) -> SelectionMethod {
        SelectionMethod::MutualInformation
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> MethodScores {
        ctx.columns
            .par_iter()
            .map(|column| mutual_information(column, ctx.target, self.bins, ctx.min_samples))
            .collect()
    }
}
