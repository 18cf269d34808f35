//! Fatal errors for a versioning run
//!
//! Anything surfaced here aborts the whole run. Per-project problems
//! (missing version line, missing major version) are not errors; they are
//! reported as [`crate::patcher::PatchOutcome`] values instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a versioning run.
#[derive(Error, Debug)]
pub enum StampError {
    /// Transport-level failure talking to the CI provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CI provider answered with a non-success status.
    #[error("API request to {url} failed with HTTP {status}: {message}")]
    Api {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it is not JSON.
        message: String,
    },

    /// Reading or writing a metadata file failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Enumerating the workspace root failed.
    #[error("Failed to list workspace: {0}")]
    Walk(#[from] walkdir::Error),

    /// `owner/repo` could not be parsed.
    #[error("Invalid repository '{0}', expected 'owner/repo'")]
    InvalidRepository(String),
}

impl StampError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
