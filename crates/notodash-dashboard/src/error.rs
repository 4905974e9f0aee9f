//! Error types for dashboard runs

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a selection step or a whole run
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Cannot create output root {path}: {source}")]
    OutputRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot discover sources under {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("Cannot fingerprint {path}: {message}")]
    Fingerprint { path: PathBuf, message: String },

    #[error("Version control error: {0}")]
    Vcs(#[from] notodash_vcs::VcsError),

    #[error("Issue tracker setup failed: {0}")]
    Tracker(#[from] notodash_github::GitHubError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] notodash_http::HttpError),

    #[error(transparent)]
    Storage(#[from] notodash_storage::StorageError),
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
