//! Error types for ACDEF
//!
//! Validation errors surface at construction time and are never retryable.
//! Connection errors carry the attempt bookkeeping so callers can decide
//! whether another `initialize()` is worthwhile.

use std::path::PathBuf;

/// Main error type for ACDEF operations
#[derive(Debug, thiserror::Error)]
pub enum AcdefError {
    #[error("Invalid configuration: {field} = {value} ({constraint})")]
    InvalidConfiguration {
        field: String,
        value: String,
        constraint: String,
    },

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log sink {}: {source}", .path.display())]
    LogSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load credentials: {0}")]
    CredentialLoad(String),

    #[error("Connection attempt {attempt}/{max_retries} failed: {reason}")]
    ConnectionAttemptFailed {
        attempt: u32,
        max_retries: u32,
        reason: String,
    },

    #[error("Connection exhausted after {attempts} attempts: {last_error}")]
    ConnectionExhausted { attempts: u32, last_error: String },

    #[error("Document store is not initialized")]
    NotInitialized,

    #[error("Database error: {0}")]
    Database(String),
}

impl AcdefError {
    /// Build an `InvalidConfiguration` error for a single field
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Whether the same call may succeed if repeated without changing inputs
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::DirectoryCreation { .. }
            | Self::LogSink { .. }
            | Self::ConnectionAttemptFailed { .. }
            | Self::Database(_) => true,
            Self::InvalidConfiguration { .. }
            | Self::InvalidLogLevel(_)
            | Self::CredentialLoad(_)
            | Self::ConnectionExhausted { .. }
            | Self::NotInitialized => false,
        }
    }
}

impl From<mongodb::error::Error> for AcdefError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for AcdefError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Database(format!("BSON encoding failed: {}", err))
    }
}

/// Result type alias for ACDEF operations
pub type Result<T> = std::result::Result<T, AcdefError>;
