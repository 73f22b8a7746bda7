//! Error types for the provisioning pipeline
//!
//! Every failure carries enough context (operation, resource kind, ARN) to
//! tell the operator which step stopped and what to look at next.

use crate::names::ResourceKind;
use aws_sdk_personalize::error::DisplayErrorContext;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, TrainError>;

#[derive(Error, Debug)]
pub enum TrainError {
    /// An AWS API call failed
    #[error("AWS {operation} failed: {message}")]
    Aws {
        operation: &'static str,
        message: String,
    },

    /// An AWS response did not carry a field the pipeline depends on
    #[error("AWS {operation} response is missing '{field}'")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Stack '{stack}' does not exist. Deploy the stack for this stage before training.")]
    StackNotFound { stack: String },

    #[error("Stack '{stack}' has no output '{key}'. Check the stack template outputs.")]
    MissingStackOutput { stack: String, key: String },

    #[error("Invalid schema document '{path}': {source}")]
    InvalidSchema {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed rating row at line {line}: {reason}")]
    InvalidRating { line: u64, reason: String },

    /// The service reported a terminal failure for an asynchronous resource
    #[error("{kind} {arn} failed: {reason}")]
    ResourceFailed {
        kind: ResourceKind,
        arn: String,
        reason: String,
    },

    #[error("Timed out after {waited_secs}s waiting for {kind} {arn} (last status: {last_status})")]
    WaitTimedOut {
        kind: ResourceKind,
        arn: String,
        last_status: String,
        waited_secs: u64,
    },

    #[error("Cancelled while waiting for {kind} {arn}")]
    WaitCancelled { kind: ResourceKind, arn: String },

    #[error("{0} resources cannot be listed by name")]
    Unlistable(ResourceKind),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl TrainError {
    /// Wrap an SDK error, keeping the full source chain in the message
    pub fn aws<E: std::error::Error>(operation: &'static str, err: E) -> Self {
        Self::Aws {
            operation,
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    pub fn missing(operation: &'static str, field: &'static str) -> Self {
        Self::MissingField { operation, field }
    }
}
