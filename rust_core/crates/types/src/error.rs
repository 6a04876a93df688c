use thiserror::Error;

/// Configuration errors shared by all crates.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter has an invalid value
    #[error("invalid parameter {param}: {reason}")]
    InvalidParameter {
        /// Dotted parameter path (e.g. `selector.target_count`).
        param: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates an `InvalidParameter` error.
    #[must_use]
    pub fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }
}
