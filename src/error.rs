//! Error types for word-walker
//!
//! This module defines the error hierarchy covering:
//! - Per-task scan errors (directory enumeration, file open/read)
//! - Configuration and CLI errors
//! - Directory lookup errors
//! - HTTP server errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the path and what failed
//! - Per-task errors are non-fatal: they travel over the error sink
//!   while the rest of the scan continues

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the word-walker application
#[derive(Error, Debug)]
pub enum CounterError {
    /// Per-task scan errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Directory lookup errors
    #[error("Lookup error: {0}")]
    Locate(#[from] LocateError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker pool errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Errors raised by individual scan tasks
///
/// These are cloneable value types (reasons captured as strings) because
/// they are sent across the error sink to a consumer on another thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Directory enumeration failed
    #[error("Failed to read directory '{path}': {reason}")]
    ReadDirFailed { path: PathBuf, reason: String },

    /// File open failed
    #[error("Failed to open file '{path}': {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// File read failed mid-stream
    #[error("Failed to read file '{path}': {reason}")]
    ReadFailed { path: PathBuf, reason: String },
}

impl ScanError {
    /// Path of the filesystem entry this error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::ReadDirFailed { path, .. } => path,
            ScanError::OpenFailed { path, .. } => path,
            ScanError::ReadFailed { path, .. } => path,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required CLI argument was not provided
    #[error("Missing required argument: {name} must be provided")]
    MissingArgument { name: &'static str },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid queue size
    #[error("Invalid queue size {size}: must be at least {min}")]
    InvalidQueueSize { size: usize, min: usize },

    /// Invalid error sink capacity
    #[error("Invalid error sink capacity {size}: must be at least {min}")]
    InvalidSinkCapacity { size: usize, min: usize },
}

/// Validation errors for counter operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Negative increments would wrap into a very large unsigned value
    #[error("Increment amount must be non-negative, got {amount}")]
    NegativeAmount { amount: i64 },

    /// Counting the empty substring is meaningless
    #[error("Target word must not be empty")]
    EmptyWord,
}

/// Directory lookup errors
#[derive(Error, Debug)]
pub enum LocateError {
    /// Search exhausted without a match
    #[error("Directory '{name}' not found under root '{root}'")]
    NotFound { name: String, root: PathBuf },

    /// Enumeration itself failed
    #[error("Failed to search under '{path}': {reason}")]
    Enumeration { path: PathBuf, reason: String },
}

/// Worker pool errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker thread could not be spawned
    #[error("Failed to start worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },

    /// Work queue disconnected while submitting
    #[error("Failed to submit task: work queue closed")]
    QueueClosed,
}

/// HTTP server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Request body could not be decoded
    #[error("Failed to decode request body: {0}")]
    BadRequest(String),

    /// Request failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// Directory lookup failed
    #[error("Failed to look for directory: {0}")]
    Lookup(#[from] LocateError),

    /// Scan finished with errors
    #[error("Failed to count word: {0}")]
    ScanFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for CounterError
pub type Result<T> = std::result::Result<T, CounterError>;

/// Result type alias for ScanError
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Result type alias for ServerError
pub type ServerResult<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_path() {
        let err = ScanError::OpenFailed {
            path: "/corpus/a.txt".into(),
            reason: "permission denied".into(),
        };
        assert_eq!(err.path(), &PathBuf::from("/corpus/a.txt"));
    }

    #[test]
    fn test_error_conversion() {
        let scan_err = ScanError::ReadDirFailed {
            path: "/missing".into(),
            reason: "no such directory".into(),
        };
        let counter_err: CounterError = scan_err.into();
        assert!(matches!(counter_err, CounterError::Scan(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::NegativeAmount { amount: -5 };
        assert!(err.to_string().contains("-5"));
    }
}
