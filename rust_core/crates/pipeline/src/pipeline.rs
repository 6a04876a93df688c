//! Pipeline facade: validate, generate, merge, select.

use std::sync::Arc;
use std::time::Instant;

use theta_data::{validate_series_length, validate_table};
use theta_generators::GeneratorStatus;
use theta_selection::{Selector, forward_log_return};
use theta_types::{OhlcvTable, PipelineConfig};

use crate::cancel::CancellationToken;
use crate::error::PipelineError;
use crate::orchestrator::Orchestrator;
use crate::report::PipelineReport;
use crate::table::FeatureTable;
use crate::validation::validate_config;

/// Input tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInput {
    /// Base timeframe table; every output column is aligned to its rows.
    pub base: OhlcvTable,
    /// Optional coarser tables used by the cross-timeframe generator.
    pub coarser: Vec<OhlcvTable>,
}

impl PipelineInput {
    /// Input with only a base table.
    #[must_use]
    pub fn new(base: OhlcvTable) -> Self {
        Self {
            base,
            coarser: Vec::new(),
        }
    }

    /// Adds a pre-aggregated coarser table.
    #[must_use]
    pub fn with_coarser(mut self, table: OhlcvTable) -> Self {
        self.coarser.push(table);
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Selected features.
    pub features: FeatureTable,
    /// Generator outcomes, selection detail and diagnostics.
    pub report: PipelineReport,
}

/// Single entry point turning an OHLCV table into a pruned feature table.
pub struct FeaturePipeline {
    orchestrator: Orchestrator,
    selector: Selector,
    horizon: usize,
}

impl FeaturePipeline {
    /// Validates `config` and registers its generators and scoring methods.
    ///
    /// # Errors
    /// Returns [`PipelineError::Config`] for an invalid configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        validate_config(&config)?;
        let orchestrator = Orchestrator::from_config(&config);
        let horizon = config.selector.target.horizon;
        let selector = Selector::new(config.selector)?;
        Ok(Self {
            orchestrator,
            selector,
            horizon,
        })
    }

    /// Registered generator names in merge order.
    #[must_use]
    pub fn generator_names(&self) -> Vec<&str> {
        self.orchestrator.generator_names()
    }

    /// Runs against the default forward-log-return target.
    ///
    /// # Errors
    /// - [`PipelineError::InputValidation`] for a malformed base or coarser table.
    /// - [`PipelineError::NoCandidates`] when no generator produced a column.
    /// - [`PipelineError::SelectionFatal`] when no column could be scored.
    pub fn run(&self, input: &PipelineInput) -> Result<PipelineOutput, PipelineError> {
        self.run_inner(input, None, None)
    }

    /// Runs against a caller-supplied target with one value per base row.
    ///
    /// # Errors
    /// Returns [`PipelineError::InputValidation`] when the target length differs
    /// from the row count, otherwise as [`run`](Self::run).
    pub fn run_with_target(
        &self,
        input: &PipelineInput,
        target: &[f64],
    ) -> Result<PipelineOutput, PipelineError> {
        self.run_inner(input, Some(target), None)
    }

    /// Runs with a token that stops generators which have not started yet.
    ///
    /// # Errors
    /// Same as [`run`](Self::run).
    pub fn run_with_cancellation(
        &self,
        input: &PipelineInput,
        token: &CancellationToken,
    ) -> Result<PipelineOutput, PipelineError> {
        self.run_inner(input, None, Some(token))
    }

    fn run_inner(
        &self,
        input: &PipelineInput,
        target: Option<&[f64]>,
        token: Option<&CancellationToken>,
    ) -> Result<PipelineOutput, PipelineError> {
        let started = Instant::now();
        let base = &input.base;
        validate_table(base)?;
        for table in &input.coarser {
            validate_table(table)?;
        }
        let rows = base.len();
        let target = match target {
            Some(series) => {
                validate_series_length("target", series, rows)?;
                series.to_vec()
            }
            None => forward_log_return(&base.closes(), self.horizon),
        };

        tracing::info!(
            rows,
            coarser = input.coarser.len(),
            generators = self.orchestrator.generator_names().len(),
            "feature pipeline started"
        );

        let merged = self.orchestrator.run(base, &input.coarser, token);
        tracing::debug!(
            candidates = merged.columns.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "candidates merged"
        );

        let timestamps: Arc<[i64]> = base.timestamps().into();
        if !merged.has_output() {
            if merged.cancelled {
                tracing::info!("run cancelled before any generator produced columns");
                let report = PipelineReport {
                    rows,
                    candidate_count: 0,
                    selected: Vec::new(),
                    generators: merged.outcomes,
                    dropped_constant: Vec::new(),
                    scores: Vec::new(),
                    selection_diagnostics: Vec::new(),
                    selector_state: None,
                    cancelled: true,
                };
                return Ok(PipelineOutput {
                    features: FeatureTable::new(timestamps, Vec::new()),
                    report,
                });
            }
            let failed = merged
                .outcomes
                .iter()
                .filter(|o| o.status == GeneratorStatus::Failed)
                .count();
            return Err(PipelineError::NoCandidates(format!(
                "{} generators ran, {failed} failed, none produced columns",
                merged.outcomes.len()
            )));
        }

        let selection = self.selector.select(&merged.columns, &target)?;
        let selected_columns: Vec<_> = selection
            .selected
            .iter()
            .map(|&i| merged.columns[i].clone())
            .collect();
        let selected: Vec<String> = selected_columns.iter().map(|c| c.name.clone()).collect();

        tracing::info!(
            rows,
            candidates = merged.columns.len(),
            dropped = selection.dropped.len(),
            selected = selected.len(),
            diagnostics = selection.diagnostics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "feature pipeline finished"
        );

        let report = PipelineReport {
            rows,
            candidate_count: merged.columns.len(),
            selected,
            generators: merged.outcomes,
            dropped_constant: selection.dropped,
            scores: selection.scores,
            selection_diagnostics: selection.diagnostics,
            selector_state: Some(selection.state),
            cancelled: merged.cancelled,
        };
        Ok(PipelineOutput {
            features: FeatureTable::new(timestamps, selected_columns),
            report,
        })
    }
}

/// Builds a pipeline from `config` and runs it once.
///
/// # Errors
/// Same as [`FeaturePipeline::new`] and [`FeaturePipeline::run`].
pub fn run_pipeline(
    input: &PipelineInput,
    config: PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    FeaturePipeline::new(config)?.run(input)
}

/// JSON-configured variant of [`run_pipeline`].
///
/// # Errors
/// Returns [`PipelineError::ConfigParse`] for malformed JSON, otherwise as
/// [`run_pipeline`].
pub fn run_pipeline_from_json(
    config_json: &str,
    input: &PipelineInput,
) -> Result<PipelineOutput, PipelineError> {
    let config = PipelineConfig::from_json(config_json)
        .map_err(|e| PipelineError::ConfigParse(e.to_string()))?;
    run_pipeline(input, config)
}
