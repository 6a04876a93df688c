//! Multi-method selector: filter, score, combine, rank and prune.

use std::collections::BTreeMap;

use rayon::prelude::*;
use theta_types::{
    CandidateColumn, ConfigError, Diagnostic, DiagnosticKind, SelectionMethod, SelectorConfig,
};

use crate::error::SelectionError;
use crate::filter::variance_filter;
use crate::methods::{MethodScores, ScoringContext, ScoringMethod, build_methods};
use crate::ranking::{combine, normalize, rank_order};
use crate::score::SelectionScore;
use crate::state::SelectorState;

/// Result of one selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Indices into the input columns of the kept columns, best first.
    pub selected: Vec<usize>,
    /// Score detail for every surviving column, in rank order.
    pub scores: Vec<SelectionScore>,
    /// Columns removed by the variance filter, in input order.
    pub dropped: Vec<String>,
    /// Method failures and notices.
    pub diagnostics: Vec<Diagnostic>,
    /// Final lifecycle state.
    pub state: SelectorState,
}

/// Checks the selector section of the configuration.
///
/// # Errors
/// Returns [`ConfigError::InvalidParameter`] naming the first bad field.
pub fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    if config.target_count == 0 {
        return Err(ConfigError::invalid("selector.target_count", "must be > 0"));
    }
    if config.methods.is_empty() {
        return Err(ConfigError::invalid("selector.methods", "at least one method is required"));
    }
    for (method, weight) in &config.weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ConfigError::invalid(
                format!("selector.weights.{method}"),
                format!("must be finite and >= 0, got {weight}"),
            ));
        }
    }
    if !config.variance_epsilon.is_finite() || config.variance_epsilon < 0.0 {
        return Err(ConfigError::invalid("selector.variance_epsilon", "must be finite and >= 0"));
    }
    if config.min_samples < 2 {
        return Err(ConfigError::invalid("selector.min_samples", "must be >= 2"));
    }
    if config.mi_bins < 2 {
        return Err(ConfigError::invalid("selector.mi_bins", "must be >= 2"));
    }
    if !config.lasso_alpha.is_finite() || config.lasso_alpha < 0.0 {
        return Err(ConfigError::invalid("selector.lasso_alpha", "must be finite and >= 0"));
    }
    if config.lasso_max_iter == 0 {
        return Err(ConfigError::invalid("selector.lasso_max_iter", "must be > 0"));
    }
    if !(config.lasso_tolerance.is_finite() && config.lasso_tolerance > 0.0) {
        return Err(ConfigError::invalid("selector.lasso_tolerance", "must be finite and > 0"));
    }
    if config.forest_trees == 0 {
        return Err(ConfigError::invalid("selector.forest_trees", "must be > 0"));
    }
    if config.forest_max_depth == 0 {
        return Err(ConfigError::invalid("selector.forest_max_depth", "must be > 0"));
    }
    if config.forest_min_samples_leaf == 0 {
        return Err(ConfigError::invalid("selector.forest_min_samples_leaf", "must be > 0"));
    }
    if config.forest_max_features == Some(0) {
        return Err(ConfigError::invalid("selector.forest_max_features", "must be > 0"));
    }
    if config.target.horizon == 0 {
        return Err(ConfigError::invalid("selector.target.horizon", "must be > 0"));
    }
    Ok(())
}

/// Scores candidate columns with several independent criteria and keeps the top N.
pub struct Selector {
    config: SelectorConfig,
    methods: Vec<Box<dyn ScoringMethod>>,
}

impl Selector {
    /// Creates a selector.
    ///
    /// # Errors
    /// Returns [`SelectionError::Config`] for an invalid selector section.
    pub fn new(config: SelectorConfig) -> Result<Self, SelectionError> {
        validate_selector_config(&config)?;
        let methods = build_methods(&config);
        Ok(Self { config, methods })
    }

    /// Selector configuration.
    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Enabled methods in configured order.
    #[must_use]
    pub fn methods(&self) -> Vec<SelectionMethod> {
        self.methods.iter().map(|m| m.method()).collect()
    }

    /// Runs the full selection over `columns` against `target`.
    ///
    /// # Errors
    /// - [`SelectionError::LengthMismatch`] when a column and the target differ in length.
    /// - [`SelectionError::Fatal`] when no surviving column received any valid score.
    pub fn select(
        &self,
        columns: &[CandidateColumn],
        target: &[f64],
    ) -> Result<SelectionOutcome, SelectionError> {
        let rows = target.len();
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(SelectionError::LengthMismatch {
                name: bad.name.clone(),
                expected: rows,
                actual: bad.len(),
            });
        }

        let mut state = SelectorState::Ready.transition(SelectorState::Scoring)?;
        let (survivors, dropped) = variance_filter(columns, self.config.variance_epsilon);
        tracing::debug!(
            candidates = columns.len(),
            survivors = survivors.len(),
            dropped = dropped.len(),
            "variance filter applied"
        );

        if survivors.is_empty() {
            state = state.transition(SelectorState::Ranking)?;
            state = state.transition(SelectorState::Pruned)?;
            return Ok(SelectionOutcome {
                selected: Vec::new(),
                scores: Vec::new(),
                dropped,
                diagnostics: Vec::new(),
                state,
            });
        }

        let views: Vec<&[f64]> = survivors.iter().map(|&i| &*columns[i].values).collect();
        let names: Vec<&str> = survivors.iter().map(|&i| columns[i].name.as_str()).collect();
        let ctx = ScoringContext {
            columns: &views,
            target,
            min_samples: self.config.min_samples,
        };
        let results: Vec<(SelectionMethod, MethodScores)> = self
            .methods
            .par_iter()
            .map(|m| (m.method(), m.score(&ctx)))
            .collect();

        let mut diagnostics = method_failures(&results, &names);

        state = state.transition(SelectorState::Ranking)?;
        let mut normalized: Vec<BTreeMap<SelectionMethod, f64>> = vec![BTreeMap::new(); names.len()];
        let mut raw: Vec<BTreeMap<SelectionMethod, f64>> = vec![BTreeMap::new(); names.len()];
        for (method, scores) in &results {
            for (i, value) in normalize(scores).into_iter().enumerate() {
                if let (Some(n), Ok(r)) = (value, &scores[i]) {
                    normalized[i].insert(*method, n);
                    raw[i].insert(*method, *r);
                }
            }
        }
        let combined: Vec<Option<f64>> = normalized
            .iter()
            .map(|scores| combine(scores, &self.config))
            .collect();

        if combined.iter().all(Option::is_none) {
            return Err(SelectionError::fatal(format!(
                "no scoring method produced a valid score for any of {} surviving columns",
                names.len()
            )));
        }

        let unscored: Vec<String> = names
            .iter()
            .zip(&combined)
            .filter(|(_, c)| c.is_none())
            .map(|(n, _)| (*n).to_string())
            .collect();
        if !unscored.is_empty() {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::SelectionNotice,
                    "selector",
                    "columns without any valid score ranked last",
                )
                .with_columns(unscored),
            );
        }

        let order = rank_order(&names, &combined);
        let keep = self.config.target_count.min(order.len());
        let mut scores = Vec::with_capacity(order.len());
        let mut selected = Vec::with_capacity(keep);
        for (pos, &i) in order.iter().enumerate() {
            if pos < keep {
                selected.push(survivors[i]);
            }
            scores.push(SelectionScore {
                column: names[i].to_string(),
                scores: std::mem::take(&mut normalized[i]),
                raw_scores: std::mem::take(&mut raw[i]),
                combined: combined[i],
                rank: pos + 1,
                selected: pos < keep,
            });
        }

        state = state.transition(SelectorState::Pruned)?;
        tracing::info!(
            survivors = names.len(),
            selected = selected.len(),
            method_failures = diagnostics.len(),
            "feature selection finished"
        );

        Ok(SelectionOutcome {
            selected,
            scores,
            dropped,
            diagnostics,
            state,
        })
    }
}

/// One diagnostic per (method, reason) listing every affected column.
fn method_failures(results: &[(SelectionMethod, MethodScores)], names: &[&str]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (method, scores) in results {
        let mut by_reason: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (name, score) in names.iter().zip(scores) {
            if let Err(reason) = score {
                by_reason
                    .entry(reason.as_str())
                    .or_default()
                    .push((*name).to_string());
            }
        }
        for (reason, cols) in by_reason {
            tracing::warn!(
                method = method.as_str(),
                columns = cols.len(),
                reason,
                "scoring method failed"
            );
            diagnostics.push(Diagnostic::method_failure(method.as_str(), reason).with_columns(cols));
        }
    }
    diagnostics
}
