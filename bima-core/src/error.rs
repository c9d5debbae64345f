use std::time::Duration;

use thiserror::Error;

/// Failures raised by the external service adapters.
///
/// These never reach an end user directly: the component that owns the adapter
/// call logs them and substitutes a local fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error("language model call failed: {0}")]
    LanguageModel(String),

    #[error("speech synthesis failed: {0}")]
    Speech(String),

    #[error("data store query failed: {0}")]
    Store(String),

    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Malformed or missing user input. Always surfaced to the immediate caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("message cannot be empty")]
    EmptyMessage,
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = AdapterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_error_display() {
        let err = AdapterError::Store("connection refused".to_string());
        assert_eq!(err.to_string(), "data store query failed: connection refused");

        let err = AdapterError::Timeout {
            operation: "top_policies",
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "top_policies timed out after 5s");

        let err = AdapterError::NotConfigured("ELEVENLABS_API_KEY");
        assert_eq!(err.to_string(), "ELEVENLABS_API_KEY is not configured");
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::MissingField("age").to_string(),
            "missing required field: age"
        );
        assert_eq!(
            ValidationError::invalid("budget", "must be a positive number").to_string(),
            "invalid value for budget: must be a positive number"
        );
    }
}
