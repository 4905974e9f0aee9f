//! Error types for the core data model

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while deriving projects or decoding state
#[derive(Debug, Error)]
pub enum CoreError {
    /// Source path has no usable file stem
    #[error("Cannot derive a family name from source path: {path}")]
    InvalidSource { path: PathBuf },

    /// Project created without any source file
    #[error("Project has no source files")]
    NoSources,

    /// Snapshot could not be decoded at all
    #[error("Snapshot decode error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
