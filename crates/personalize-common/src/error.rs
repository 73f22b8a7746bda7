//! Error types shared by the workspace crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised while setting up process-wide plumbing
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {setting} value: '{value}'")]
    InvalidSetting { setting: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

impl CommonError {
    /// Create an invalid setting error
    pub fn invalid(setting: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting,
            value: value.into(),
        }
    }
}
