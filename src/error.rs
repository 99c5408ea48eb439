//! Error types for ibsync operations.
//!
//! This module defines [`SyncError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal conditions (page discovery, archive download, extraction, payload
//!   layout) get their own variants and abort the run
//! - Recoverable conditions (a single install entry failing to copy, an
//!   unreadable version record) are reported via `tracing::warn!` at the
//!   point of failure and never become a `SyncError`
//! - Use `anyhow::Error` (via `SyncError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ibsync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The download page was unreachable or contained no matching row.
    #[error("Discovery failed: {message}")]
    Discovery { message: String },

    /// The archive could not be downloaded.
    #[error("Download failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The downloaded archive is not a readable ZIP file.
    #[error("Failed to extract {path}: {message}")]
    Extract { path: PathBuf, message: String },

    /// The extracted archive contains no recognizable payload directory.
    #[error("Payload directory not found in extracted archive; top-level entries: [{}]", .found.join(", "))]
    Layout { found: Vec<String> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ibsync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
