//! Error types for the helpdesk.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! completion API, document store, session and validation failures.

use thiserror::Error;

/// Unified error type for the helpdesk.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad config files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion API errors (transport failures, non-success status)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Completion API answered successfully but without a usable completion
    #[error("Invalid response format from API: {0}")]
    InvalidResponse(String),

    /// Document store read/write failures
    #[error("Store error: {0}")]
    Store(String),

    /// A document id that does not exist in its collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or insufficient session privileges
    #[error("Access denied: {0}")]
    Auth(String),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AppError::Config("OpenRouter API key not configured".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: OpenRouter API key not configured"
        );

        let err = AppError::InvalidResponse("missing choices".to_string());
        assert!(err.to_string().starts_with("Invalid response format from API"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
