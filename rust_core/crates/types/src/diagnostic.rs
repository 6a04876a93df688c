//! Feature families and run diagnostics shared across crates.

use serde::{Deserialize, Serialize};

/// Family tag attached to every candidate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFamily {
    /// Windowed technical indicators.
    Technical,
    /// Rolling distribution statistics.
    Statistical,
    /// Calendar and cyclical time features.
    Temporal,
    /// Base vs. coarser timeframe comparisons.
    CrossTimeframe,
    /// Composite direction and wave signals.
    Proprietary,
}

impl FeatureFamily {
    /// Canonical family order used for registration and merging.
    pub const ALL: [FeatureFamily; 5] = [
        FeatureFamily::Technical,
        FeatureFamily::Statistical,
        FeatureFamily::Temporal,
        FeatureFamily::CrossTimeframe,
        FeatureFamily::Proprietary,
    ];

    /// Returns the snake-case tag (used as collision prefix).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureFamily::Technical => "technical",
            FeatureFamily::Statistical => "statistical",
            FeatureFamily::Temporal => "temporal",
            FeatureFamily::CrossTimeframe => "cross_timeframe",
            FeatureFamily::Proprietary => "proprietary",
        }
    }
}

impl std::fmt::Display for FeatureFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recoverable problem classes recorded in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A generator partially failed; its unaffected columns still merge.
    GeneratorWarning,
    /// A generator produced no usable output.
    GeneratorFailure,
    /// One scoring method failed for one or more columns.
    SelectionMethodFailure,
    /// Informational selector event (e.g. columns left without any score).
    SelectionNotice,
}

/// A single diagnostic entry with enough context to reproduce the problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Problem class.
    pub kind: DiagnosticKind,
    /// Generator or selection method name.
    pub source: String,
    /// Affected column names (may be empty).
    #[serde(default)]
    pub columns: Vec<String>,
    /// Human-readable reason.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic without affected columns.
    #[must_use]
    pub fn new(kind: DiagnosticKind, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            columns: Vec::new(),
            message: message.into(),
        }
    }

    /// Attaches affected column names.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Shorthand for a generator warning.
    #[must_use]
    pub fn generator_warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::GeneratorWarning, source, message)
    }

    /// Shorthand for a generator failure.
    #[must_use]
    pub fn generator_failure(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::GeneratorFailure, source, message)
    }

    /// Shorthand for a selection method failure.
    #[must_use]
    pub fn method_failure(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::SelectionMethodFailure, source, message)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.source, self.message)?;
        if !self.columns.is_empty() {
            write!(f, " (columns: {})", self.columns.join(", "))?;
        }
        Ok(())
    }
}
