// src/error.rs
//! Unified error handling for neuro-core
//!
//! Every fallible operation in the crate returns [`NeuroResult`]. Estimators
//! reject malformed input with [`NeuroError::InvalidInput`] before touching
//! any fitted state, so a failed `fit` is repeatable: calling it again with
//! the same input produces the same error kind.

use thiserror::Error;

/// Unified error type for the preprocessing library
#[derive(Debug, Error)]
pub enum NeuroError {
    /// Input data has the wrong container type or rank
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Array dimensions disagree with metadata or fitted state
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Operation that detected the mismatch
        context: &'static str,
        /// Dimensions the operation required
        expected: String,
        /// Dimensions it received
        actual: String,
    },

    /// `transform` called on an estimator that was never fitted
    #[error("estimator `{0}` used before fit")]
    NotFitted(&'static str),

    /// Parameter outside its valid range
    #[error("bad parameter `{name}`: {reason}")]
    BadParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Epoch extraction failed
    #[error("epoching failed: {0}")]
    Epoching(String),

    /// Filesystem error while reading or writing fixtures
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Recording or event-table (de)serialization failed
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration layer error
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type alias used throughout the crate
pub type NeuroResult<T> = Result<T, NeuroError>;

impl NeuroError {
    /// Shorthand for shape mismatches with formatted dimensions.
    pub(crate) fn shape(
        context: &'static str,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        NeuroError::ShapeMismatch {
            context,
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_context() {
        let err = NeuroError::shape("scaler.transform", (4usize, 120usize), (3usize, 120usize));
        let msg = format!("{}", err);
        assert!(msg.contains("scaler.transform"));
        assert!(msg.contains("(4, 120)"));
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NeuroError>();
    }
}
