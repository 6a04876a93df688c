//! Selection error types.

use crate::state::SelectorState;
use theta_types::ConfigError;
use thiserror::Error;

/// Errors that abort a selection run.
///
/// Per-method, per-column problems are not errors; they become
/// `selection_method_failure` diagnostics.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A state change that the selector lifecycle does not allow.
    #[error("invalid selector transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: SelectorState,
        /// Requested state.
        to: SelectorState,
    },

    /// Every enabled method failed for every surviving column.
    #[error("selection failed: {0}")]
    Fatal(String),

    /// A column or the target does not match the row count.
    #[error("length mismatch for {name}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Column or series name.
        name: String,
        /// Expected row count.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Selector configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SelectionError {
    /// Creates a `Fatal` error.
    #[must_use]
    pub fn fatal(msg: impl Into<String>) -> Self {
        SelectionError::Fatal(msg.into())
    }
}
