// src/error.rs

//! Unified error handling for the PhishGuard client.
//!
//! Each pipeline stage has its own small error enum so callers can match on
//! the failure that concerns them. `AppError` wraps all of them together with
//! the infrastructure errors (I/O, HTTP, serialization) for the CLI boundary.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// File selection rejected by the ingestor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Media type is not the accepted tabular type
    #[error("invalid file type '{found}', expected '{expected}'")]
    InvalidType { found: String, expected: String },

    /// File exceeds the configured ceiling (only when enforcement is enabled)
    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

/// Submission to the prediction endpoint failed.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The service answered with a non-success status
    #[error("prediction service rejected the upload with status {status}")]
    RemoteRejected { status: u16 },

    /// The request never produced a response
    #[error("prediction service unreachable: {0}")]
    TransportFailure(String),

    /// The file's media type cannot be sent as a part header
    #[error("invalid media type '{0}'")]
    InvalidMediaType(String),
}

/// The raw report did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("report contains no result table")]
    NoTableFound,
}

/// Remote training could not be completed.
#[derive(Error, Debug)]
pub enum TrainingError {
    /// The service answered with a non-success status
    #[error("training endpoint rejected the request with status {status}")]
    RemoteRejected { status: u16 },

    /// The request never produced a response
    #[error("training endpoint unreachable: {0}")]
    TransportFailure(String),

    /// A run from this trigger is still in flight
    #[error("a training run is already in progress")]
    AlreadyRunning,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Result store error
    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Training(#[from] TrainingError),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}
