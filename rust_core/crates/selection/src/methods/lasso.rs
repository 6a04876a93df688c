//! L1-regularized linear regression via cyclic coordinate descent.

use super::{Design, MethodScores, ScoringContext, ScoringMethod, fail_all};
use theta_types::SelectionMethod;

/// Scores a column by the magnitude of its Lasso coefficient.
///
/// Both the columns and the target are standardized, so coefficients are in
/// correlation units and `alpha` does not depend on the target's scale.
#[derive(Debug, Clone, Copy)]
pub struct LassoScorer {
    alpha: f64,
    max_iter: usize,
    tolerance: f64,
}

impl LassoScorer {
    /// Creates a scorer.
    #[must_use]
    pub fn new(alpha: f64, max_iter: usize, tolerance: f64) -> Self {
        Self {
            alpha,
            max_iter,
            tolerance,
        }
    }
}

/// Soft thresholding operator.
fn soft_threshold(x: f64, lambda: f64) -> f64 {
    if x > lambda {
        x - lambda
    } else if x < -lambda {
        x + lambda
    } else {
        0.0
    }
}

/// Fits `min (1/2n)||y - Xb||^2 + alpha * ||b||_1` for standardized columns.
///
/// Returns the coefficients and whether the sweep converged.
#[must_use]
pub fn coordinate_descent(
    columns: &[&[f64]],
    target: &[f64],
    alpha: f64,
    max_iter: usize,
    tolerance: f64,
) -> (Vec<f64>, bool) {
    let n = target.len() as f64;
    let mut coef = vec![0.0; columns.len()];
    let mut residual = target.to_vec();
    if target.is_empty() {
        return (coef, true);
    }

    let squared: Vec<f64> = columns
        .iter()
        .map(|x| x.iter().map(|v| v * v).sum::<f64>() / n)
        .collect();

    for _ in 0..max_iter {
        let mut max_delta: f64 = 0.0;
        for (j, x) in columns.iter().enumerate() {
            if squared[j] <= 1e-10 {
                continue;
            }
            let old = coef[j];
            let rho = x.iter().zip(&residual).map(|(a, r)| a * r).sum::<f64>() / n
                + squared[j] * old;
            let new = soft_threshold(rho, alpha) / squared[j];
            let delta = new - old;
            if delta.abs() > 0.0 {
                for (r, a) in residual.iter_mut().zip(x.iter()) {
                    *r -= a * delta;
                }
            }
            coef[j] = new;
            max_delta = max_delta.max(delta.abs());
        }
        if max_delta < tolerance {
            return (coef, true);
        }
    }
    (coef, false)
}

impl ScoringMethod for LassoScorer {
    fn method(&self) -> SelectionMethod {
        SelectionMethod::RegularizedLinear
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> MethodScores {
        let design = match Design::build(ctx) {
            Ok(design) => design,
            Err(reason) => return fail_all(ctx.columns.len(), &reason),
        };

        let usable: Vec<(usize, &[f64])> = design
            .features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().ok().map(|v| (i, v.as_slice())))
            .collect();
        let matrix: Vec<&[f64]> = usable.iter().map(|(_, v)| *v).collect();
        let (coef, converged) = coordinate_descent(
            &matrix,
            &design.target,
            self.alpha,
            self.max_iter,
            self.tolerance,
        );
        if !converged {
            tracing::debug!(
                max_iter = self.max_iter,
                "lasso coordinate descent stopped before convergence"
            );
        }

        let mut scores: MethodScores = design
            .features
            .iter()
            .map(|f| match f {
                Ok(_) => Ok(0.0),
                Err(reason) => Err(reason.clone()),
            })
            .collect();
        for ((i, _), c) in usable.iter().zip(coef) {
            scores[*i] = Ok(c.abs());
        }
        scores
    }
}
