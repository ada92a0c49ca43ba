//! Error types for the tournament engines
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Callers that need to branch on the failure kind can
//! recover the typed variant with `downcast_ref::<EngineError>()`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific engine failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("Invalid rating: {reason}")]
    InvalidRating { reason: String },

    #[error("Volatility solver did not converge after {iterations} iterations")]
    NumericDivergence { iterations: usize },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl EngineError {
    pub fn invalid_roster(reason: impl Into<String>) -> Self {
        Self::InvalidRoster {
            reason: reason.into(),
        }
    }

    pub fn invalid_rating(reason: impl Into<String>) -> Self {
        Self::InvalidRating {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }
}
