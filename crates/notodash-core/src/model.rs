//! Projects, build results and issue records

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::family::family_name;

/// A font project discovered in the source tree
///
/// Projects are rebuilt from a directory scan on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Family name derived from the primary source
    pub family: String,
    /// Source files, primary first
    pub sources: Vec<PathBuf>,
    /// Version-control fingerprint of the primary source, if it could be computed
    pub fingerprint: Option<String>,
}

impl Project {
    /// Create a project from one or more sources; the first one names the family
    pub fn from_sources<I, P>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let sources: Vec<PathBuf> = sources.into_iter().map(Into::into).collect();
        let primary = sources.first().ok_or(CoreError::NoSources)?;
        let family = family_name(primary)?;

        Ok(Self {
            family,
            sources,
            fingerprint: None,
        })
    }

    /// Primary source file (drives the family name and the fingerprint)
    pub fn primary_source(&self) -> &Path {
        &self.sources[0]
    }

    /// Attach the fingerprint computed for this run
    pub fn with_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.fingerprint = fingerprint;
        self
    }
}

/// Output bucket shown in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
    /// Variable fonts
    Variable,
    /// Unhinted static fonts
    Unhinted,
    /// Hinted static fonts
    Hinted,
}

impl OutputCategory {
    /// Classify a path relative to the output root by substring
    ///
    /// `variable` wins over `unhinted`, which wins over `hinted`; paths that
    /// match none of them have no category.
    pub fn classify(relative_path: &str) -> Option<Self> {
        if relative_path.contains("variable") {
            Some(OutputCategory::Variable)
        } else if relative_path.contains("unhinted") {
            Some(OutputCategory::Unhinted)
        } else if relative_path.contains("hinted") {
            Some(OutputCategory::Hinted)
        } else {
            None
        }
    }
}

/// A produced artifact as listed in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Path relative to the output root
    pub path: String,
    /// Base file name
    pub display: String,
}

impl OutputEntry {
    /// Create an entry; the display name is the last path component
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let display = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self { path, display }
    }
}

/// Group relative output paths into report buckets, sorted by path
pub fn categorize_outputs<I, S>(paths: I) -> BTreeMap<OutputCategory, Vec<OutputEntry>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut paths: Vec<String> = paths.into_iter().map(Into::into).collect();
    paths.sort();
    paths.dedup();

    let mut outputs: BTreeMap<OutputCategory, Vec<OutputEntry>> = BTreeMap::new();
    for path in paths {
        if let Some(category) = OutputCategory::classify(&path) {
            outputs
                .entry(category)
                .or_default()
                .push(OutputEntry::new(path));
        }
    }
    outputs
}

/// Outcome of one build attempt for one family
///
/// Created once per attempt and folded into the persisted state as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    /// Family name
    pub family: String,
    /// Fingerprint of the primary source at build time
    #[serde(rename = "commit")]
    pub fingerprint: Option<String>,
    /// Build log path relative to the output root
    pub log: String,
    /// Build error, present iff the build step failed
    pub errors: Option<String>,
    /// QA report path relative to the output root
    #[serde(rename = "fontbakery")]
    pub qa_report: Option<String>,
    /// Badge files relative to the output root
    #[serde(default)]
    pub badges: Vec<String>,
    /// Produced artifacts by category
    #[serde(default)]
    pub outputs: BTreeMap<OutputCategory, Vec<OutputEntry>>,
}

impl BuildResult {
    /// Create an empty result for a family; the log lives at `<family>/build.log`
    pub fn new(family: impl Into<String>) -> Self {
        let family = family.into();
        Self {
            log: format!("{}/build.log", family),
            family,
            fingerprint: None,
            errors: None,
            qa_report: None,
            badges: Vec::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Set the fingerprint
    pub fn with_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Record the build error
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors = Some(error.into());
        self
    }

    /// Set the QA report path
    pub fn with_qa_report(mut self, report: impl Into<String>) -> Self {
        self.qa_report = Some(report.into());
        self
    }

    /// Set the badge paths
    pub fn with_badges(mut self, badges: Vec<String>) -> Self {
        self.badges = badges;
        self
    }

    /// Categorise and set the produced artifacts
    pub fn with_outputs<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = categorize_outputs(paths);
        self
    }

    /// Whether the build step failed
    pub fn is_failed(&self) -> bool {
        self.errors.is_some()
    }

    /// Total number of categorised artifacts
    pub fn output_count(&self) -> usize {
        self.outputs.values().map(Vec::len).sum()
    }
}

/// An open tracker issue attached to a family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Issue number
    pub id: u64,
    /// Issue title
    pub title: String,
}

impl IssueRecord {
    /// Create a new issue record
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_from_sources() {
        let project = Project::from_sources(["src/NotoSans-MM.glyphs", "src/NotoSans-ItalicMM.glyphs"])
            .unwrap();
        assert_eq!(project.family, "Noto Sans");
        assert_eq!(project.sources.len(), 2);
        assert_eq!(project.primary_source(), Path::new("src/NotoSans-MM.glyphs"));
        assert!(project.fingerprint.is_none());
    }

    #[test]
    fn test_project_without_sources() {
        let result = Project::from_sources(Vec::<PathBuf>::new());
        assert!(matches!(result, Err(CoreError::NoSources)));
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(
            OutputCategory::classify("Noto Sans/unhinted/variable-ttf/NotoSans[wght].ttf"),
            Some(OutputCategory::Variable)
        );
        assert_eq!(
            OutputCategory::classify("Noto Sans/unhinted/otf/NotoSans-Bold.otf"),
            Some(OutputCategory::Unhinted)
        );
        assert_eq!(
            OutputCategory::classify("Noto Sans/hinted/ttf/NotoSans-Bold.ttf"),
            Some(OutputCategory::Hinted)
        );
        assert_eq!(OutputCategory::classify("Noto Sans/build.log"), None);
    }

    #[test]
    fn test_categorize_outputs() {
        let outputs = categorize_outputs([
            "Noto Sans/hinted/ttf/NotoSans-Regular.ttf",
            "Noto Sans/unhinted/ttf/NotoSans-Regular.ttf",
            "Noto Sans/unhinted/otf/NotoSans-Regular.otf",
            "Noto Sans/unhinted/variable-ttf/NotoSans[wght].ttf",
            "Noto Sans/misc/readme.txt",
        ]);

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[&OutputCategory::Unhinted].len(), 2);
        assert_eq!(
            outputs[&OutputCategory::Unhinted][0].path,
            "Noto Sans/unhinted/otf/NotoSans-Regular.otf"
        );
        assert_eq!(
            outputs[&OutputCategory::Variable][0].display,
            "NotoSans[wght].ttf"
        );
        assert_eq!(outputs[&OutputCategory::Hinted].len(), 1);
    }

    #[test]
    fn test_build_result_json_keys() {
        let result = BuildResult::new("Noto Sans")
            .with_fingerprint(Some("abc1234 (Fix kerning, 2024-01-02)".to_string()))
            .with_qa_report("Noto Sans/fontbakery-report.html")
            .with_outputs(["Noto Sans/unhinted/ttf/NotoSans-Regular.ttf"]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["family"], "Noto Sans");
        assert_eq!(json["commit"], "abc1234 (Fix kerning, 2024-01-02)");
        assert_eq!(json["log"], "Noto Sans/build.log");
        assert!(json["errors"].is_null());
        assert_eq!(json["fontbakery"], "Noto Sans/fontbakery-report.html");
        assert_eq!(
            json["outputs"]["unhinted"][0]["display"],
            "NotoSans-Regular.ttf"
        );
    }
}
