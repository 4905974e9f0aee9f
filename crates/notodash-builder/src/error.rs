//! Error types for font builds

use std::path::PathBuf;

use notodash_process::ProcessError;
use thiserror::Error;

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised by the build, hinting and QA collaborators
#[derive(Debug, Error)]
pub enum BuildError {
    /// External tool could not be run or failed
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Filesystem operation failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Build configuration could not be written
    #[error("Failed to serialise build configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Artifact path does not fit the output layout
    #[error("Unexpected artifact location: {path}")]
    Layout { path: PathBuf },
}

impl BuildError {
    /// Wrap an IO error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
