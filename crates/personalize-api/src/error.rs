//! Error types for the recommendation endpoint

use thiserror::Error;

/// Result type alias for endpoint operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing path parameter '{0}'")]
    MissingPathParameter(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The recommendation service call failed
    #[error("AWS {operation} failed: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
