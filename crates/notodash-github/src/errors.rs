//! GitHub Integration Error Types

use thiserror::Error;

/// Errors that can occur during GitHub operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// API error from GitHub
    #[error("GitHub API error: {0}")]
    ApiError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Octocrab client could not be built
    #[error("GitHub client error: {0}")]
    ClientError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GitHubError {
    /// Create a new API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        GitHubError::ApiError(msg.into())
    }

    /// Create a new config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        GitHubError::ConfigError(msg.into())
    }

    /// Create a new client error
    pub fn client_error(msg: impl Into<String>) -> Self {
        GitHubError::ClientError(msg.into())
    }
}

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;
