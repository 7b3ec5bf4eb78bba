//! Common error types for the check-in services

use serde::Serialize;
use thiserror::Error;

/// Common result type for check-in operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single field-level validation failure
///
/// Surfaced inline next to the offending field; the user corrects the
/// input and retries. Never produced by anything that mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Common error types across the check-in services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found (also covers reaching a workflow
    /// stage without the context it needs)
    #[error("Not found: {0}")]
    NotFound(String),

    /// One or more fields failed validation
    #[error("Validation failed ({} field{})", .0.len(), if .0.len() == 1 { "" } else { "s" })]
    Validation(Vec<FieldError>),

    /// Lifecycle action attempted in a stage that does not allow it
    #[error("Cannot {action} while in the {stage} stage")]
    InvalidTransition {
        stage: &'static str,
        action: &'static str,
    },

    /// Finalize attempted before every required checklist item is complete
    #[error("Checklist incomplete: {0}")]
    Incomplete(String),

    /// Completion notification delivery failure (best-effort, swallowed
    /// at the finalize call site)
    #[error("Notification error: {0}")]
    Notify(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
