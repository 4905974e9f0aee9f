//! Open issue listing

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GitHubConfig;
use crate::errors::{GitHubError, Result};

/// An open issue with its label names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Label names
    pub labels: Vec<String>,
}

impl TrackerIssue {
    /// Create an issue
    pub fn new<I, S>(number: u64, title: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            number,
            title: title.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of open issues
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// All open issues of the configured repository
    async fn open_issues(&self) -> Result<Vec<TrackerIssue>>;
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    number: u64,
    title: String,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct IssueQuery {
    state: &'static str,
    per_page: u8,
    page: u32,
}

/// GitHub-backed tracker
pub struct GitHubIssueTracker {
    client: octocrab::Octocrab,
    config: GitHubConfig,
}

impl GitHubIssueTracker {
    /// Build an octocrab client for the configuration
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: GitHubConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = octocrab::OctocrabBuilder::new()
            .set_connect_timeout(Some(config.timeout))
            .set_read_timeout(Some(config.timeout));
        if let Some(base_uri) = &config.base_uri {
            builder = builder
                .base_uri(base_uri.as_str())
                .map_err(|e| GitHubError::client_error(format!("Invalid base URI: {}", e)))?;
        }
        if let Some(token) = &config.token {
            builder = builder.personal_token(token.clone());
        }

        let client = builder
            .build()
            .map_err(|e| GitHubError::client_error(format!("Failed to create GitHub client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Tracker configuration
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }
}

#[async_trait]
impl IssueTracker for GitHubIssueTracker {
    async fn open_issues(&self) -> Result<Vec<TrackerIssue>> {
        let (owner, repo) = self.config.owner_and_repo()?;
        let route = format!("/repos/{}/{}/issues", owner, repo);

        let mut issues = Vec::new();
        for page in 1..=self.config.max_pages {
            let query = IssueQuery {
                state: "open",
                per_page: self.config.per_page,
                page,
            };
            let batch: Vec<ApiIssue> = self
                .client
                .get(&route, Some(&query))
                .await
                .map_err(|e| GitHubError::api_error(e.to_string()))?;

            debug!(page, count = batch.len(), "Fetched issue page");
            let last_page = batch.len() < usize::from(self.config.per_page);

            issues.extend(
                batch
                    .into_iter()
                    .filter(|issue| issue.pull_request.is_none())
                    .map(|issue| TrackerIssue {
                        number: issue.number,
                        title: issue.title,
                        labels: issue.labels.into_iter().map(|label| label.name).collect(),
                    }),
            );

            if last_page {
                break;
            }
        }

        info!(repository = %self.config.repository, count = issues.len(), "Listed open issues");
        Ok(issues)
    }
}
