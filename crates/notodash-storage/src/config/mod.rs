//! Dashboard configuration

mod env;
mod loader;

pub use env::EnvOverrides;
pub use loader::{ConfigFormat, ConfigLoader};

use std::path::PathBuf;
use std::time::Duration;

use notodash_http::HttpConfig;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Settings for one dashboard run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory scanned for `*.glyphs` and `*/*.designspace` sources
    pub source_root: PathBuf,
    /// Output tree root; created if absent, never cleared
    pub output_root: PathBuf,
    /// Maximum projects rebuilt per run
    pub max_build: usize,
    /// Family names never built
    pub denylist: Vec<String>,
    /// Published snapshot location; the local snapshot is read when absent
    pub snapshot_url: Option<String>,
    /// Local snapshot written by every run
    pub snapshot_path: PathBuf,
    /// Rendered report destination
    pub report_path: PathBuf,
    /// Handlebars template overriding the built-in one
    pub template_path: Option<PathBuf>,
    /// Base URL for commit hyperlinks
    pub commit_url: String,
    /// Issue tracker repository as `owner/repo`
    pub issue_repository: String,
    /// Label prefix marking script keys
    pub issue_label_prefix: String,
    /// Tracker API token
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    /// Timeout for each external tool invocation
    pub tool_timeout_secs: u64,
    /// Timeout for the snapshot request
    pub http_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            output_root: PathBuf::from("output"),
            max_build: 10,
            denylist: Vec::new(),
            snapshot_url: None,
            snapshot_path: PathBuf::from("output/state.json"),
            report_path: PathBuf::from("output/dashboard.html"),
            template_path: None,
            commit_url: "https://github.com/googlefonts/noto-source/commit".to_string(),
            issue_repository: "googlefonts/noto-fonts".to_string(),
            issue_label_prefix: "Script-".to_string(),
            github_token: None,
            tool_timeout_secs: 3600,
            http_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&std::path::Path>) -> StorageResult<Self> {
        let mut config = match path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => Self::default(),
        };
        EnvOverrides::apply(&mut config);
        Ok(config)
    }

    /// Reject settings a run cannot work with
    pub fn validate(&self) -> StorageResult<()> {
        if self.max_build == 0 {
            return Err(StorageError::validation_error(
                "max_build",
                "must be greater than 0",
            ));
        }

        let valid_repository = matches!(
            self.issue_repository.split_once('/'),
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/')
        );
        if !valid_repository {
            return Err(StorageError::validation_error(
                "issue_repository",
                format!("expected owner/repo, got '{}'", self.issue_repository),
            ));
        }

        if self.tool_timeout_secs == 0 {
            return Err(StorageError::validation_error(
                "tool_timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(StorageError::validation_error(
                "http_timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// External tool timeout
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Snapshot request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Client settings for fetching the published snapshot
    pub fn snapshot_http(&self) -> HttpConfig {
        HttpConfig::for_snapshot(self.http_timeout())
    }
}
