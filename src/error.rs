//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Structured conditions are raised as [`RatingError`] and
//! can be recovered with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Invalid range: minimum {min} is greater than maximum {max}")]
    InvalidRange { min: usize, max: usize },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal inference error: {message}")]
    InternalError { message: String },
}

impl RatingError {
    /// Shorthand for an [`RatingError::InvalidArgument`] with the given reason
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`RatingError::ConfigurationError`] with the given message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Whether this error rejected caller input before any computation ran
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
