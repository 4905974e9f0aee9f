//! HTML dashboard rendering

use std::collections::BTreeMap;
use std::path::Path;

use handlebars::Handlebars;
use notodash_core::{BuildResult, IssueRecord, PersistedState, StoredEntry};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{IoOperation, StorageError, StorageResult};

const TEMPLATE_NAME: &str = "dashboard";

const BUILTIN_TEMPLATE: &str = include_str!("../templates/dashboard.hbs");

static LEADING_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)").expect("valid commit id regex"));

/// Wrap the leading commit id of a fingerprint in a link
///
/// ```
/// use notodash_storage::commit_link;
///
/// assert_eq!(
///     commit_link("a1b2c3d (Fix kerning, 2024-01-02)", "https://example.org/commit"),
///     "<a href=\"https://example.org/commit/a1b2c3d\">a1b2c3d</a> (Fix kerning, 2024-01-02)"
/// );
/// ```
pub fn commit_link(fingerprint: &str, commit_url: &str) -> String {
    let replacement = format!(r#"<a href="{}/$1">$1</a>"#, commit_url.trim_end_matches('/'));
    LEADING_ID
        .replace(fingerprint, replacement.as_str())
        .into_owned()
}

/// Stored fields of one family
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    /// A decoded build result
    Result(BuildResult),
    /// Fields of an entry kept as loaded
    Fields(serde_json::Map<String, serde_json::Value>),
}

impl From<StoredEntry<'_>> for ReportEntry {
    fn from(entry: StoredEntry<'_>) -> Self {
        match entry {
            StoredEntry::Decoded(result) => ReportEntry::Result(result.clone()),
            StoredEntry::Verbatim(value) => {
                ReportEntry::Fields(value.as_object().cloned().unwrap_or_default())
            }
        }
    }
}

/// One family as shown in the report
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    /// Persisted fields
    #[serde(flatten)]
    pub entry: ReportEntry,
    /// Fingerprint with its commit id hyperlinked
    pub commit_link: Option<String>,
    /// Correlated open issues
    pub issues: Vec<IssueRecord>,
}

/// Template data: `{projects: {family -> project}}` plus link bases
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    /// Projects keyed by family name
    pub projects: BTreeMap<String, ProjectReport>,
    /// Base URL for issue links
    pub issue_url: String,
    /// Render time, RFC 3339
    pub generated: String,
}

impl ReportData {
    /// Combine the final state with this run's issue associations
    pub fn new(
        state: &PersistedState,
        issues: &BTreeMap<String, Vec<IssueRecord>>,
        commit_url: &str,
        issue_repository: &str,
    ) -> Self {
        let projects = state
            .entries()
            .map(|(family, entry)| {
                let report = ProjectReport {
                    commit_link: entry
                        .fingerprint()
                        .map(|fingerprint| commit_link(fingerprint, commit_url)),
                    issues: issues.get(family).cloned().unwrap_or_default(),
                    entry: entry.into(),
                };
                (family.to_string(), report)
            })
            .collect();

        Self {
            projects,
            issue_url: format!("https://github.com/{}/issues", issue_repository),
            generated: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Renders the dashboard with handlebars
pub struct ReportRenderer {
    registry: Handlebars<'static>,
}

impl ReportRenderer {
    /// Renderer using the built-in template
    pub fn builtin() -> StorageResult<Self> {
        Self::from_template(BUILTIN_TEMPLATE)
    }

    /// Renderer using a template file
    pub fn from_file(path: &Path) -> StorageResult<Self> {
        let template = std::fs::read_to_string(path)
            .map_err(|e| StorageError::io_error(path.to_path_buf(), IoOperation::Read, e))?;
        debug!(path = %path.display(), "Loaded report template");
        Self::from_template(&template)
    }

    /// Renderer using the given file, or the built-in template when `None`
    pub fn new(template_path: Option<&Path>) -> StorageResult<Self> {
        match template_path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Renderer for a template source
    pub fn from_template(template: &str) -> StorageResult<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| StorageError::template(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Render the report text
    pub fn render(&self, data: &ReportData) -> StorageResult<String> {
        self.registry
            .render(TEMPLATE_NAME, data)
            .map_err(|e| StorageError::template(e.to_string()))
    }

    /// Render and write the report to `path`
    pub async fn write(&self, data: &ReportData, path: &Path) -> StorageResult<()> {
        let html = self.render(data)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::directory_creation_failed(parent.to_path_buf(), e))?;
        }
        tokio::fs::write(path, html)
            .await
            .map_err(|e| StorageError::io_error(path.to_path_buf(), IoOperation::Write, e))?;

        info!(path = %path.display(), projects = data.projects.len(), "Wrote report");
        Ok(())
    }
}
