//! Generator error types.
//!
//! These never cross the orchestrator boundary: the [`ColumnSink`](crate::ColumnSink)
//! converts each one into a diagnostic.

use theta_indicators::IndicatorError;
use thiserror::Error;

/// Problems a generator can hit while producing one block of columns.
#[derive(Debug, Error, PartialEq)]
pub enum GeneratorError {
    /// Fewer rows than a window needs.
    #[error("insufficient rows for {what}: need {required}, got {actual}")]
    InsufficientRows {
        /// Column block or indicator that was skipped.
        what: String,
        /// Required row count.
        required: usize,
        /// Available row count.
        actual: usize,
    },

    /// Configuration values the generator cannot use.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Optional input is absent (e.g. no coarser timeframe).
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Numeric computation failed.
    #[error("computation error: {0}")]
    Computation(String),

    /// Indicator rejected its parameters or input.
    #[error("{name}: {source}")]
    Indicator {
        /// Column block the indicator was feeding.
        name: String,
        /// Underlying indicator error.
        source: IndicatorError,
    },
}

impl GeneratorError {
    /// Wraps an indicator error with the name of the affected column block.
    #[must_use]
    pub fn indicator(name: impl Into<String>, source: IndicatorError) -> Self {
        GeneratorError::Indicator {
            name: name.into(),
            source,
        }
    }

    /// Creates an `InvalidConfig` error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        GeneratorError::InvalidConfig(msg.into())
    }

    /// Whether the error only degrades output (warning) rather than failing it.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GeneratorError::InsufficientRows { .. }
                | GeneratorError::MissingInput(_)
                | GeneratorError::Indicator {
                    source: IndicatorError::InsufficientData { .. },
                    ..
                }
        )
    }
}
