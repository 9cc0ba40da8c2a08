//! Custom error types for xv.
//!
//! Structured errors with enough context to tell the caller what went
//! wrong and, for fatal startup errors, what to do about it.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for xv operations.
#[derive(Error, Debug)]
pub enum XvError {
    // =========================================================================
    // Data Root / Startup Errors
    // =========================================================================
    /// Data root directory not found at the specified path.
    #[error("Data root not found at '{path}'")]
    DataRootNotFound { path: PathBuf },

    /// Database file missing at startup. Fatal before serving.
    #[error("Database not found at '{path}'. Run 'xv ingest <data_root>' first.")]
    DatabaseNotFound { path: PathBuf },

    /// Configuration file parsing error.
    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigError { path: PathBuf, reason: String },

    // =========================================================================
    // Ingestion Errors
    // =========================================================================
    /// An export document failed to parse or is missing required keys.
    #[error("Invalid export document '{file}': {reason}")]
    InvalidDocument { file: String, reason: String },

    /// A profile image/banner download failed. Best-effort: the batch continues.
    #[error("Download failed for '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Tweet or user id not present in the store.
    #[error("{item_type} with id '{id}' not found")]
    NotFound { item_type: &'static str, id: i64 },

    // =========================================================================
    // IO Errors
    // =========================================================================
    /// File read/write error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path-specific IO error with context.
    #[error("Failed to {operation} '{path}': {source}")]
    Path {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Web Errors
    // =========================================================================
    /// Server failed to bind or serve.
    #[error("Server error: {0}")]
    Server(String),

    /// Wrapped anyhow error for the binary edge.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for xv operations.
pub type Result<T> = std::result::Result<T, XvError>;

impl XvError {
    /// Create a data root not found error.
    pub fn data_root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DataRootNotFound { path: path.into() }
    }

    /// Create a database not found error.
    pub fn database_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DatabaseNotFound { path: path.into() }
    }

    /// Create an invalid document error.
    pub fn invalid_document(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a download failure error.
    pub fn download_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error.
    pub const fn not_found(item_type: &'static str, id: i64) -> Self {
        Self::NotFound { item_type, id }
    }

    /// Create a path error with context.
    pub fn path_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Path {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether this failure is contained at batch-item granularity:
    /// the ingest loop logs it, counts it, and moves on.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::InvalidDocument { .. } | Self::DownloadFailed { .. }
        )
    }
}
