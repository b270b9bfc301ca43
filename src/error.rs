//! Error types for CollabAlign.

use std::time::Duration;

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Session and form-input errors. Always reported to the caller.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown stage: {0}")]
    InvalidStage(String),

    #[error("Answers must be between 1 and 5: {}", fields.join(", "))]
    OutOfRange { fields: Vec<String> },

    #[error("Missing answers for: {}", fields.join(", "))]
    MissingTraits { fields: Vec<String> },

    #[error("Unknown personality traits: {}", fields.join(", "))]
    UnknownTraits { fields: Vec<String> },

    #[error("Progress override must be between 0 and 100, got {0}")]
    InvalidProgress(u32),

    #[error("Session {0} not found")]
    NotFound(Uuid),

    /// The request body or path could not be decoded.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

/// Text-generation collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
