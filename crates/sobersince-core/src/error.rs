//! Core error types for sobersince-core.
//!
//! This module defines the error hierarchy using thiserror. Nothing in the
//! core is crash-worthy: every failure either degrades to a typed error the
//! UI can surface or is clamped away before it can occur.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sobersince-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings persistence errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Quote fetch errors
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Settings-persistence errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load the settings file
    #[error("Failed to load settings from {}: {}", .path.display(), .message)]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save the settings file
    #[error("Failed to save settings to {}: {}", .path.display(), .message)]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid settings value
    #[error("Invalid settings value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
///
/// These are recovered locally (the offending value is clamped to a valid
/// one before the error is reported), so an `Err` here is a user-visible
/// flag rather than a failed operation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A sobriety start date in the future was rejected and clamped to now.
    #[error("start date {candidate} is in the future (now: {now}); start kept at {now}")]
    StartInFuture {
        candidate: chrono::DateTime<chrono::Utc>,
        now: chrono::DateTime<chrono::Utc>,
    },
}

/// Quote-fetch errors. Always surfaced as the failure arm of a
/// [`QuoteResult`](crate::quote::QuoteResult), never raised synchronously.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Transport-level failure (DNS, connect, TLS, mid-body disconnect)
    #[error("quote request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("quote endpoint returned HTTP {status}")]
    Http { status: u16 },

    /// The payload was not the expected `{content, author}` shape
    #[error("quote payload could not be decoded: {0}")]
    Decode(String),

    /// The fetch task was cancelled before it resolved
    #[error("quote fetch was cancelled")]
    Cancelled,
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
