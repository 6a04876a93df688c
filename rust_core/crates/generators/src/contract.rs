//! The contract every feature family implements.

use serde::{Deserialize, Serialize};
use theta_types::{Diagnostic, FeatureFamily, OhlcvTable};

/// Read-only view handed to every generator.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorInput<'a> {
    /// Base-timeframe table; output columns align 1:1 with its rows.
    pub base: &'a OhlcvTable,
    /// Coarser tables of the same instrument supplied by the caller.
    pub coarser: &'a [OhlcvTable],
    /// Row count below which windowed generators emit nothing.
    pub min_rows: usize,
}

impl<'a> GeneratorInput<'a> {
    /// Creates an input view.
    #[must_use]
    pub fn new(base: &'a OhlcvTable, coarser: &'a [OhlcvTable], min_rows: usize) -> Self {
        Self {
            base,
            coarser,
            min_rows,
        }
    }

    /// Number of base rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.base.len()
    }
}

/// Final status of one generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorStatus {
    /// All columns produced, no diagnostics.
    Succeeded,
    /// Some output produced, or only warnings recorded.
    PartiallySucceeded,
    /// Errors and no usable columns.
    Failed,
    /// Never started because the run was cancelled.
    Skipped,
}

impl GeneratorStatus {
    /// Snake-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorStatus::Succeeded => "succeeded",
            GeneratorStatus::PartiallySucceeded => "partially_succeeded",
            GeneratorStatus::Failed => "failed",
            GeneratorStatus::Skipped => "skipped",
        }
    }
}

/// Per-generator status record kept in the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOutcome {
    /// Generator name.
    pub generator: String,
    /// Family tag.
    pub family: FeatureFamily,
    /// Final status.
    pub status: GeneratorStatus,
    /// Produced column names (after the orchestrator's collision renames).
    pub columns: Vec<String>,
    /// Warnings and failures recorded while generating.
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratorOutcome {
    /// Outcome for a generator that did not start.
    #[must_use]
    pub fn skipped(generator: impl Into<String>, family: FeatureFamily, reason: &str) -> Self {
        let generator = generator.into();
        Self {
            diagnostics: vec![Diagnostic::generator_warning(generator.clone(), reason)],
            generator,
            family,
            status: GeneratorStatus::Skipped,
            columns: Vec::new(),
        }
    }

    /// Outcome for a generator that produced nothing because of `message`.
    #[must_use]
    pub fn failed(generator: impl Into<String>, family: FeatureFamily, message: &str) -> Self {
        let generator = generator.into();
        Self {
            diagnostics: vec![Diagnostic::generator_failure(generator.clone(), message)],
            generator,
            family,
            status: GeneratorStatus::Failed,
            columns: Vec::new(),
        }
    }

    /// True when the generator contributed at least one column.
    #[must_use]
    pub fn contributed(&self) -> bool {
        matches!(
            self.status,
            GeneratorStatus::Succeeded | GeneratorStatus::PartiallySucceeded
        ) && !self.columns.is_empty()
    }
}

/// Columns plus outcome returned by [`FeatureGenerator::generate`].
#[derive(Debug, Clone)]
pub struct GeneratorOutput {
    /// Named columns, each with one value per base row.
    pub columns: Vec<(String, Vec<f64>)>,
    /// Status record.
    pub outcome: GeneratorOutcome,
}

/// A stateless transform from the input table to named numeric columns.
///
/// Implementations must not panic on degenerate data: flat windows, windows
/// longer than the input and zero denominators produce NaN or a diagnostic.
pub trait FeatureGenerator: Send + Sync {
    /// Unique generator name (used as diagnostic source).
    fn name(&self) -> &str;

    /// Family tag for every produced column.
    fn family(&self) -> FeatureFamily;

    /// Whether the generator is gated by `min_rows`.
    fn is_windowed(&self) -> bool {
        true
    }

    /// Produces columns aligned with `input.base`.
    fn generate(&self, input: &GeneratorInput<'_>) -> GeneratorOutput;
}
