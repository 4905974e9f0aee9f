//! Tracker configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{GitHubError, Result};

/// Where to read issues from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Repository as `owner/repo`
    pub repository: String,
    /// Optional API token; anonymous access otherwise
    #[serde(skip_serializing, default)]
    pub token: Option<String>,
    /// API base URI override (GitHub Enterprise, tests)
    #[serde(default)]
    pub base_uri: Option<String>,
    /// Issues requested per page
    #[serde(default = "default_per_page")]
    pub per_page: u8,
    /// Upper bound on pages fetched in one listing
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Connect and read timeout per request
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_per_page() -> u8 {
    100
}

fn default_max_pages() -> u32 {
    50
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl GitHubConfig {
    /// Create a configuration for `owner/repo`
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            token: None,
            base_uri: None,
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            timeout: default_timeout(),
        }
    }

    /// Set the API token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Point the client at another API host
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the page size
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// Split the repository into `(owner, repo)`
    pub fn owner_and_repo(&self) -> Result<(&str, &str)> {
        match self.repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok((owner, repo))
            }
            _ => Err(GitHubError::config_error(format!(
                "Repository must be of the form owner/repo, got '{}'",
                self.repository
            ))),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.owner_and_repo()?;
        if self.per_page == 0 {
            return Err(GitHubError::config_error("Page size must be greater than 0"));
        }
        if self.max_pages == 0 {
            return Err(GitHubError::config_error("Page limit must be greater than 0"));
        }
        if self.timeout.is_zero() {
            return Err(GitHubError::config_error("Timeout must be greater than 0"));
        }
        Ok(())
    }
}
