//! Issue correlation by script key

use std::collections::BTreeMap;
use std::sync::Arc;

use notodash_core::{IssueRecord, PersistedState};
use notodash_github::{IssueTracker, TrackerIssue};
use tracing::{debug, info, warn};

/// Open issues grouped by script key
///
/// A key is a label name with the configured prefix removed. An issue with
/// several matching labels is listed under each of their keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueIndex {
    by_key: BTreeMap<String, Vec<IssueRecord>>,
}

impl IssueIndex {
    /// Group `issues` by the labels starting with `label_prefix`
    pub fn build<'a, I>(issues: I, label_prefix: &str) -> Self
    where
        I: IntoIterator<Item = &'a TrackerIssue>,
    {
        let mut by_key: BTreeMap<String, Vec<IssueRecord>> = BTreeMap::new();
        for issue in issues {
            for label in &issue.labels {
                if let Some(key) = label.strip_prefix(label_prefix) {
                    by_key
                        .entry(key.to_string())
                        .or_default()
                        .push(IssueRecord::new(issue.number, issue.title.clone()));
                }
            }
        }
        Self { by_key }
    }

    /// Number of script keys
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Issues listed under a script key
    pub fn get(&self, key: &str) -> Option<&[IssueRecord]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    /// Every issue whose script key occurs anywhere in `family`
    ///
    /// Keys are visited in sorted order; an issue reached through two keys is
    /// listed twice.
    pub fn issues_for(&self, family: &str) -> Vec<IssueRecord> {
        self.by_key
            .iter()
            .filter(|(key, _)| family.contains(key.as_str()))
            .flat_map(|(_, issues)| issues.iter().cloned())
            .collect()
    }

    /// Issue lists for every family in `state`
    pub fn correlate(&self, state: &PersistedState) -> BTreeMap<String, Vec<IssueRecord>> {
        state
            .families()
            .map(|family| (family.to_string(), self.issues_for(family)))
            .collect()
    }
}

/// Fetches open issues once per run and indexes them
pub struct IssueCorrelator {
    tracker: Arc<dyn IssueTracker>,
    label_prefix: String,
}

impl IssueCorrelator {
    pub fn new(tracker: Arc<dyn IssueTracker>, label_prefix: impl Into<String>) -> Self {
        Self {
            tracker,
            label_prefix: label_prefix.into(),
        }
    }

    /// Build the index, or an empty one when the tracker is unavailable
    pub async fn fetch_index(&self) -> IssueIndex {
        match self.tracker.open_issues().await {
            Ok(issues) => {
                let index = IssueIndex::build(&issues, &self.label_prefix);
                info!(issues = issues.len(), keys = index.len(), "Indexed open issues");
                index
            }
            Err(e) => {
                warn!(error = %e, "Couldn't fetch open issues, continuing without them");
                IssueIndex::default()
            }
        }
    }

    /// Fetch once and correlate against every family in `state`
    pub async fn correlate(&self, state: &PersistedState) -> (IssueIndex, BTreeMap<String, Vec<IssueRecord>>) {
        let index = self.fetch_index().await;
        let issues = index.correlate(state);
        debug!(families = issues.len(), "Correlated issues");
        (index, issues)
    }
}
