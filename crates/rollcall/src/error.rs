//! Error types for rollcall.
//!
//! This module defines the crate-wide error type. Workflow rejections that a
//! user is expected to correct live next to their workflows
//! ([`CheckInError`], [`AdminError`]) and convert into [`Error`] here.

use std::path::PathBuf;
use thiserror::Error;

use crate::admin::AdminError;
use crate::checkin::CheckInError;

/// The main error type for rollcall operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Workflow Errors ===
    /// A check-in was rejected.
    #[error("check-in rejected: {0}")]
    CheckIn(#[from] CheckInError),

    /// An admin operation was rejected.
    #[error("admin operation rejected: {0}")]
    Admin(#[from] AdminError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an export file.
    #[error("failed to write export to {path}: {source}")]
    ExportWrite {
        /// Destination of the export.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for rollcall operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error is a rejection the user can correct, as opposed to
    /// an operational failure.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::CheckIn(_) | Self::Admin(_))
    }

    /// Whether this error is a delete aimed at a row that no longer exists.
    #[must_use]
    pub fn is_stale_index(&self) -> bool {
        matches!(self, Self::Admin(AdminError::IndexOutOfRange { .. }))
    }
}
