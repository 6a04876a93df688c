//! Structured run report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use theta_generators::{GeneratorOutcome, GeneratorStatus};
use theta_selection::{SelectionScore, SelectorState};
use theta_types::{Diagnostic, DiagnosticKind};

use crate::error::PipelineError;

/// Everything a caller needs to audit a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Input row count.
    pub rows: usize,
    /// Columns in the merged candidate set.
    pub candidate_count: usize,
    /// Selected column names, best first.
    pub selected: Vec<String>,
    /// One outcome per registered generator, in canonical order.
    pub generators: Vec<GeneratorOutcome>,
    /// Columns removed by the variance filter before scoring.
    #[serde(default)]
    pub dropped_constant: Vec<String>,
    /// Score detail per surviving column, in rank order.
    #[serde(default)]
    pub scores: Vec<SelectionScore>,
    /// Method failures and selector notices.
    #[serde(default)]
    pub selection_diagnostics: Vec<Diagnostic>,
    /// Final selector state; `None` when selection did not run.
    #[serde(default)]
    pub selector_state: Option<SelectorState>,
    /// Whether cancellation skipped at least one generator.
    #[serde(default)]
    pub cancelled: bool,
}

impl PipelineReport {
    /// Generator diagnostics (canonical order) followed by selection diagnostics.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.generators
            .iter()
            .flat_map(|g| g.diagnostics.iter())
            .chain(self.selection_diagnostics.iter())
    }

    /// Diagnostics of one kind.
    #[must_use]
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.diagnostics().filter(|d| d.kind == kind).collect()
    }

    /// Outcome of a generator by name.
    #[must_use]
    pub fn generator(&self, name: &str) -> Option<&GeneratorOutcome> {
        self.generators.iter().find(|g| g.generator == name)
    }

    /// Number of generators that ended in `status`.
    #[must_use]
    pub fn count_status(&self, status: GeneratorStatus) -> usize {
        self.generators.iter().filter(|g| g.status == status).count()
    }

    /// Converts to plain JSON data.
    ///
    /// # Errors
    /// Returns [`PipelineError::ReportSerialize`] if serialization fails.
    pub fn to_plain(&self) -> Result<Value, PipelineError> {
        serde_json::to_value(self).map_err(|e| PipelineError::ReportSerialize(e.to_string()))
    }

    /// Rebuilds a report from [`to_plain`](Self::to_plain) output.
    ///
    /// # Errors
    /// Returns [`PipelineError::ReportSerialize`] for data that is not a report.
    pub fn from_plain(value: Value) -> Result<Self, PipelineError> {
        serde_json::from_value(value).map_err(|e| PipelineError::ReportSerialize(e.to_string()))
    }

    /// Serializes to a JSON string.
    ///
    /// # Errors
    /// Returns [`PipelineError::ReportSerialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string(self).map_err(|e| PipelineError::ReportSerialize(e.to_string()))
    }

    /// Parses a JSON string produced by [`to_json`](Self::to_json).
    ///
    /// # Errors
    /// Returns [`PipelineError::ReportSerialize`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(json).map_err(|e| PipelineError::ReportSerialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use theta_types::{FeatureFamily, SelectionMethod};

    fn sample() -> PipelineReport {
        PipelineReport {
            rows: 3,
            candidate_count: 2,
            selected: vec!["sma_5".to_string()],
            generators: vec![GeneratorOutcome {
                generator: "technical".to_string(),
                family: FeatureFamily::Technical,
                status: GeneratorStatus::PartiallySucceeded,
                columns: vec!["sma_5".to_string(), "flat".to_string()],
                diagnostics: vec![Diagnostic::generator_warning("technical", "sma_50: too short")],
            }],
            dropped_constant: vec!["flat".to_string()],
            scores: vec![SelectionScore {
                column: "sma_5".to_string(),
                scores: BTreeMap::from([(SelectionMethod::Variance, 1.0)]),
                raw_scores: BTreeMap::from([(SelectionMethod::Variance, 0.123_456_789_012_345_6)]),
                combined: Some(1.0),
                rank: 1,
                selected: true,
            }],
            selection_diagnostics: vec![
                Diagnostic::method_failure("correlation", "only 2 paired finite samples, need 8")
                    .with_columns(vec!["sma_5".to_string()]),
            ],
            selector_state: Some(SelectorState::Pruned),
            cancelled: false,
        }
    }

    #[test]
    fn test_plain_roundtrip_is_exact() {
        let report = sample();
        let back = PipelineReport::from_plain(report.to_plain().unwrap()).unwrap();
        assert_eq!(back, report);

        let back = PipelineReport::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_plain_uses_snake_case_tags() {
        let plain = sample().to_plain().unwrap();
        assert_eq!(plain["generators"][0]["status"], "partially_succeeded");
        assert_eq!(plain["selection_diagnostics"][0]["kind"], "selection_method_failure");
        assert_eq!(plain["selector_state"], "pruned");
        assert!(plain["scores"][0]["raw_scores"]["variance"].is_f64());
    }

    #[test]
    fn test_diagnostics_chain_generators_first() {
        let report = sample();
        let sources: Vec<&str> = report.diagnostics().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["technical", "correlation"]);
        assert_eq!(report.diagnostics_of(DiagnosticKind::SelectionMethodFailure).len(), 1);
        assert_eq!(report.count_status(GeneratorStatus::PartiallySucceeded), 1);
    }

    #[test]
    fn test_from_plain_rejects_garbage() {
        let err = PipelineReport::from_plain(serde_json::json!({"rows": "many"})).unwrap_err();
        assert_eq!(err.error_category(), "runtime");
    }
}
