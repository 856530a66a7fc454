//! Error types for tdx.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in tdx operations.
#[derive(Error, Debug)]
pub enum TdxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("List does not exist: {name:?}\nAvailable lists: {}", .available.join(", "))]
    ListNotFound { name: String, available: Vec<String> },

    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("No VTODO component in {}", .0.display())]
    NotATodo(PathBuf),

    #[error("Item not found: {0}")]
    ItemNotFound(u32),

    #[error("Item not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Invalid SEQUENCE value: {0:?}")]
    InvalidSequence(String),

    #[error("Invalid {property} value: {value:?}")]
    InvalidValue { property: String, value: String },

    #[error("Cannot {action} todo {id}: status is {status}")]
    InvalidTransition {
        id: u32,
        action: &'static str,
        status: String,
    },

    #[error("Can not write item without a path")]
    MissingPath,

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tdx operations.
pub type TdxResult<T> = Result<T, TdxError>;
