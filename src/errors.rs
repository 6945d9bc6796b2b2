//! Error types for Open Canvas
//!
//! One error enum for the whole crate; the binary wraps it in `anyhow`
//! at the top level.

use thiserror::Error;

/// Main error type for canvas operations
#[derive(Error, Debug)]
pub enum CanvasError {
    /// The assistant has no vector index bound
    #[error("Vector index not configured for this assistant.")]
    IndexNotConfigured,

    /// Retrieval was asked to run on a conversation with no messages
    #[error("Conversation has no messages to answer")]
    EmptyConversation,

    /// A template placeholder had no value supplied
    #[error("Missing value for template variable '{name}'")]
    MissingTemplateVariable { name: String },

    /// Form validation failures
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Record lookup failures
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Embedding provider errors
    #[error("Embedding API error: {0}")]
    EmbeddingApiError(String),

    /// Vector index provider errors
    #[error("Vector index API error: {0}")]
    VectorApiError(String),

    /// Language model provider errors
    #[error("LLM API error: {0}")]
    LlmApiError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("Canvas error: {0}")]
    Generic(String),
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Convert anyhow errors to CanvasError
impl From<anyhow::Error> for CanvasError {
    fn from(err: anyhow::Error) -> Self {
        CanvasError::Generic(err.to_string())
    }
}

impl CanvasError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CanvasError::NotFound { kind, id: id.into() }
    }
}
