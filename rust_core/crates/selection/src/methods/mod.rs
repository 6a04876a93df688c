//! Scoring methods.
//!
//! Each method scores every surviving column against the target (or, for
//! `variance`, on its own). A per-column `Err` carries the failure reason and
//! becomes a `selection_method_failure` diagnostic; the column is then scored
//! by the remaining methods.

pub mod correlation;
pub mod forest;
pub mod lasso;
pub mod mutual_info;
pub mod variance;

use crate::stats::{finite, mean, variance as population_variance};
use theta_types::{SelectionMethod, SelectorConfig};

pub use correlation::CorrelationScorer;
pub use forest::ForestScorer;
pub use lasso::LassoScorer;
pub use mutual_info::MutualInfoScorer;
pub use variance::RangeVarianceScorer;

/// Raw score (or failure reason) per column, aligned with the input columns.
pub type MethodScores = Vec<Result<f64, String>>;

/// Read-only inputs shared by all methods.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Surviving candidate columns (after the variance filter).
    pub columns: &'a [&'a [f64]],
    /// Target series, NaN where undefined.
    pub target: &'a [f64],
    /// Minimum pairwise-finite rows for supervised methods.
    pub min_samples: usize,
}

/// A column-scoring criterion.
pub trait ScoringMethod: Send + Sync {
    /// Method identifier (also the diagnostic source).
    fn method(&self) -> SelectionMethod;

    /// Scores every column in `ctx.columns`; higher is more relevant.
    fn score(&self, ctx: &ScoringContext<'_>) -> MethodScores;
}

/// Builds the enabled methods in configured order, ignoring repeats.
#[must_use]
pub fn build_methods(config: &SelectorConfig) -> Vec<Box<dyn ScoringMethod>> {
    let mut seen = Vec::new();
    let mut methods: Vec<Box<dyn ScoringMethod>> = Vec::new();
    for &method in &config.methods {
        if seen.contains(&method) {
            continue;
        }
        seen.push(method);
        methods.push(match method {
            SelectionMethod::Correlation => Box::new(CorrelationScorer),
            SelectionMethod::MutualInformation => Box::new(MutualInfoScorer::new(config.mi_bins)),
            SelectionMethod::RegularizedLinear => Box::new(LassoScorer::new(
                config.lasso_alpha,
                config.lasso_max_iter,
                config.lasso_tolerance,
            )),
            SelectionMethod::EnsembleImportance => Box::new(ForestScorer::from_config(config)),
            SelectionMethod::Variance => Box::new(RangeVarianceScorer),
        });
    }
    methods
}

/// Standardized design matrix over the rows where the target is finite.
///
/// Feature NaNs are imputed with the column mean over those rows. A column
/// that is constant after cleaning keeps its failure reason instead.
#[derive(Debug, Clone)]
pub(crate) struct Design {
    pub(crate) target: Vec<f64>,
    pub(crate) features: Vec<Result<Vec<f64>, String>>,
}

impl Design {
    pub(crate) fn build(ctx: &ScoringContext<'_>) -> Result<Design, String> {
        let rows: Vec<usize> = ctx
            .target
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, _)| i)
            .collect();
        if rows.len() < ctx.min_samples {
            return Err(format!(
                "only {} rows with a finite target, need {}",
                rows.len(),
                ctx.min_samples
            ));
        }

        let target: Vec<f64> = rows.iter().map(|&i| ctx.target[i]).collect();
        let target = standardize(target).ok_or("target is constant after cleaning")?;

        let features = ctx
            .columns
            .iter()
            .map(|column| {
                let picked: Vec<f64> = rows.iter().map(|&i| column[i]).collect();
                let fill = mean(&finite(&picked));
                if fill.is_nan() {
                    return Err("no finite values on target rows".to_string());
                }
                let imputed = picked
                    .into_iter()
                    .map(|v| if v.is_finite() { v } else { fill })
                    .collect();
                standardize(imputed).ok_or_else(|| "constant after cleaning".to_string())
            })
            .collect();

        Ok(Design { target, features })
    }
}

/// Zero mean, unit population variance; `None` when the series is flat.
fn standardize(mut values: Vec<f64>) -> Option<Vec<f64>> {
    let m = mean(&values);
    let sd = population_variance(&values).sqrt();
    if !(sd.is_finite() && sd > crate::stats::SPREAD_EPS) {
        return None;
    }
    for v in &mut values {
        *v = (*v - m) / sd;
    }
    Some(values)
}

/// Fails every column with the same reason.
pub(crate) fn fail_all(count: usize, reason: &str) -> MethodScores {
    vec![Err(reason.to_string()); count]
}
