//! Core error type.

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the goal model and catalog.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A numeric or textual argument was rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Goal type tag not recognized
    #[error("Unknown goal type: {0}")]
    UnknownGoalType(String),

    /// Template tier not recognized
    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    /// No template at the requested position
    #[error("No template #{index} in tier {tier}")]
    TemplateNotFound {
        /// Tier searched
        tier: String,
        /// Requested index
        index: usize,
    },

    /// Catalog file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reject NaN and infinities, naming the offending field.
pub fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::InvalidArgument(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}
