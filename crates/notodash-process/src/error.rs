//! Error types for process management

use std::io;
use thiserror::Error;

/// Process management errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process
    #[error("Failed to spawn {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Process timed out
    #[error("{command} timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// Waiting on the process failed
    #[error("Failed to wait for {command}: {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Process exited unsuccessfully
    #[error("{command} exited with {status}: {stderr_tail}")]
    Failed {
        command: String,
        status: String,
        stderr_tail: String,
    },

    /// Failed to kill process
    #[error("Failed to kill process: {0}")]
    KillFailed(String),
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;
