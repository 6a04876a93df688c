//! Pipeline error types.

use serde::{Deserialize, Serialize};
use serde_json::json;
use theta_data::DataError;
use theta_selection::SelectionError;
use theta_types::ConfigError;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Everything recoverable (generator warnings and failures, per-column method
/// failures) is reported as a diagnostic instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration JSON could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Configuration value rejected
    #[error("config validation error: {0}")]
    Config(#[from] ConfigError),

    /// Input table or target failed validation
    #[error("input validation error: {0}")]
    InputValidation(#[from] DataError),

    /// Every scoring method failed for every surviving column
    #[error("selection failed: {0}")]
    SelectionFatal(String),

    /// Selector misuse (invalid lifecycle transition, length mismatch)
    #[error("selection error: {0}")]
    Selection(SelectionError),

    /// No generator produced a usable column
    #[error("no candidate features: {0}")]
    NoCandidates(String),

    /// Arrow export failed
    #[error("export error: {0}")]
    Export(#[from] arrow::error::ArrowError),

    /// Report (de)serialization failed
    #[error("report serialization error: {0}")]
    ReportSerialize(String),
}

impl From<SelectionError> for PipelineError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::Fatal(msg) => PipelineError::SelectionFatal(msg),
            SelectionError::Config(e) => PipelineError::Config(e),
            other => PipelineError::Selection(other),
        }
    }
}

impl PipelineError {
    /// Returns true if this is a config parse/validation error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, PipelineError::ConfigParse(_) | PipelineError::Config(_))
    }

    /// Returns the error category for the output contract.
    /// Categories: `config`, `input`, `selection`, `runtime`
    #[must_use]
    pub fn error_category(&self) -> &'static str {
        match self {
            PipelineError::ConfigParse(_) | PipelineError::Config(_) => "config",
            PipelineError::InputValidation(_) => "input",
            PipelineError::SelectionFatal(_) | PipelineError::Selection(_) => "selection",
            PipelineError::NoCandidates(_)
            | PipelineError::Export(_)
            | PipelineError::ReportSerialize(_) => "runtime",
        }
    }
}

/// Plain error record for JSON callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Error category
    pub category: String,
    /// Error message
    pub message: String,
    /// Additional error details
    #[serde(default)]
    pub details: serde_json::Value,
}

impl From<&PipelineError> for ErrorResult {
    fn from(err: &PipelineError) -> Self {
        let details = match err {
            PipelineError::InputValidation(DataError::LengthMismatch {
                name,
                expected,
                actual,
            }) => json!({ "series": name, "expected": expected, "actual": actual }),
            _ => json!({}),
        };
        Self {
            category: err.error_category().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_config() {
        let err = PipelineError::ConfigParse("invalid json".to_string());
        assert_eq!(err.error_category(), "config");
        assert!(err.is_config_error());

        let err = PipelineError::Config(ConfigError::invalid("min_rows", "must be > 0"));
        assert_eq!(err.error_category(), "config");
    }

    #[test]
    fn test_error_category_input() {
        let err = PipelineError::from(DataError::EmptyData);
        assert_eq!(err.error_category(), "input");
        assert_eq!(err.to_string(), "input validation error: Empty data");
    }

    #[test]
    fn test_selection_fatal_is_unwrapped() {
        let err = PipelineError::from(SelectionError::fatal("nothing scored"));
        assert!(matches!(err, PipelineError::SelectionFatal(_)));
        assert_eq!(err.error_category(), "selection");
    }

    #[test]
    fn test_error_result_details() {
        let err = PipelineError::from(DataError::LengthMismatch {
            name: "target".to_string(),
            expected: 10,
            actual: 9,
        });
        let result = ErrorResult::from(&err);
        assert_eq!(result.category, "input");
        assert_eq!(result.details["expected"], 10);
    }
}
