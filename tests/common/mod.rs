//! Fake collaborators for whole-pipeline tests

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notodash_builder::{
    BuildError, BuildOptions, BuildStage, FontBuilder, FontProjectBuilder, Hinter, HintingHook,
    ProjectBuildRunner, QaChecker, QaRequest, StageReport,
};
use notodash_core::PersistedState;
use notodash_dashboard::{Dashboard, DashboardError, DashboardServices, FingerprintSource};
use notodash_github::{GitHubError, IssueTracker, TrackerIssue};
use notodash_storage::{DashboardConfig, ReportRenderer, StateStore};
use tempfile::TempDir;

/// Report template listing issue ids per family
pub const ISSUE_TEMPLATE: &str =
    "{{#each projects}}{{@key}}:{{#each issues}}{{id}},{{/each}};{{/each}}";

/// Fingerprints keyed by source file name; unknown names fail
#[derive(Default)]
pub struct FakeFingerprints {
    current: Mutex<HashMap<String, String>>,
}

impl FakeFingerprints {
    pub fn set(&self, file_name: &str, fingerprint: &str) {
        self.current
            .lock()
            .unwrap()
            .insert(file_name.to_string(), fingerprint.to_string());
    }

    pub fn forget(&self, file_name: &str) {
        self.current.lock().unwrap().remove(file_name);
    }
}

impl FingerprintSource for FakeFingerprints {
    fn fingerprint(&self, path: &Path) -> notodash_dashboard::Result<String> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.current
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .ok_or_else(|| DashboardError::Fingerprint {
                path: path.to_path_buf(),
                message: "not committed".to_string(),
            })
    }
}

/// Writes one variable and one static TTF per family
#[derive(Default)]
pub struct FakeBuilder {
    failing: Mutex<BTreeSet<String>>,
    built: Mutex<Vec<String>>,
    /// Families in the snapshot file when each static stage started
    snapshot_seen: Mutex<Vec<Vec<String>>>,
    snapshot_path: Mutex<Option<PathBuf>>,
}

impl FakeBuilder {
    pub fn fail(&self, family: &str) {
        self.failing.lock().unwrap().insert(family.to_string());
    }

    pub fn watch_snapshot(&self, path: &Path) {
        *self.snapshot_path.lock().unwrap() = Some(path.to_path_buf());
    }

    pub fn built(&self) -> Vec<String> {
        self.built.lock().unwrap().clone()
    }

    pub fn snapshot_seen(&self) -> Vec<Vec<String>> {
        self.snapshot_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl FontBuilder for FakeBuilder {
    async fn build(
        &self,
        options: &BuildOptions,
        stage: BuildStage,
    ) -> notodash_builder::Result<StageReport> {
        let stem = options.family_name.replace(' ', "");
        let file = match stage {
            BuildStage::Variable => options.vf_dir.join(format!("{}[wght].ttf", stem)),
            BuildStage::Static => {
                self.built.lock().unwrap().push(options.family_name.clone());
                if let Some(path) = self.snapshot_path.lock().unwrap().as_ref() {
                    let families = fs::read_to_string(path)
                        .ok()
                        .and_then(|content| PersistedState::from_json_lenient(&content).ok())
                        .map(|load| load.state.families().map(str::to_string).collect())
                        .unwrap_or_default();
                    self.snapshot_seen.lock().unwrap().push(families);
                }
                if self.failing.lock().unwrap().contains(&options.family_name) {
                    return Err(BuildError::Layout {
                        path: options.tt_dir.clone(),
                    });
                }
                options.tt_dir.join(format!("{}-Regular.ttf", stem))
            }
        };

        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"font").unwrap();
        Ok(StageReport {
            outputs: vec![file],
            transcript: format!("{} ok\n", stage.as_str()),
        })
    }
}

pub struct CopyHinter;

#[async_trait]
impl Hinter for CopyHinter {
    async fn hint(&self, input: &Path, output: &Path) -> notodash_builder::Result<()> {
        fs::copy(input, output).unwrap();
        Ok(())
    }
}

/// Writes the report and one badge
pub struct BadgeQa;

#[async_trait]
impl QaChecker for BadgeQa {
    async fn check(&self, request: &QaRequest) -> notodash_builder::Result<String> {
        fs::write(&request.html_report, "<html></html>").unwrap();
        fs::write(request.badges_dir.join("outlines.json"), "{}").unwrap();
        Ok(format!("checked {} fonts\n", request.fonts.len()))
    }
}

pub struct FakeTracker {
    pub issues: Option<Vec<TrackerIssue>>,
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn open_issues(&self) -> notodash_github::Result<Vec<TrackerIssue>> {
        self.issues
            .clone()
            .ok_or_else(|| GitHubError::api_error("tracker offline"))
    }
}

/// A source tree, an output tree and the fakes shared across runs
pub struct Workspace {
    pub dir: TempDir,
    pub fingerprints: Arc<FakeFingerprints>,
    pub builder: Arc<FakeBuilder>,
    pub issues: Option<Vec<TrackerIssue>>,
    pub template: Option<&'static str>,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        Self {
            dir,
            fingerprints: Arc::new(FakeFingerprints::default()),
            builder: Arc::new(FakeBuilder::default()),
            issues: Some(Vec::new()),
            template: None,
        }
    }

    /// Add a committed source file
    pub fn add_source(&self, relative: &str, fingerprint: &str) {
        let path = self.dir.path().join("src").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "source").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.fingerprints.set(&name, fingerprint);
    }

    pub fn output_root(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.output_root().join("state.json")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_root().join("dashboard.html")
    }

    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            source_root: self.dir.path().join("src"),
            output_root: self.output_root(),
            snapshot_path: self.snapshot_path(),
            report_path: self.report_path(),
            ..Default::default()
        }
    }

    pub fn dashboard(&self, config: DashboardConfig) -> Dashboard {
        let builder = FontProjectBuilder::new(self.builder.clone())
            .with_post_artifact(Arc::new(HintingHook::new(Arc::new(CopyHinter))));
        let runner = ProjectBuildRunner::new(builder, Arc::new(BadgeQa), config.output_root.clone());
        let renderer = match self.template {
            Some(template) => ReportRenderer::from_template(template).unwrap(),
            None => ReportRenderer::builtin().unwrap(),
        };

        let services = DashboardServices {
            fingerprints: self.fingerprints.clone(),
            runner,
            tracker: Arc::new(FakeTracker {
                issues: self.issues.clone(),
            }),
            store: StateStore::local(config.snapshot_path.clone()),
            renderer,
        };
        Dashboard::new(config, services)
    }

    /// Persisted snapshot as written by the last run
    pub fn snapshot(&self) -> PersistedState {
        let content = fs::read_to_string(self.snapshot_path()).unwrap();
        let load = PersistedState::from_json_lenient(&content).unwrap();
        assert!(load.undecoded.is_empty());
        load.state
    }

    pub fn write_snapshot(&self, state: &PersistedState) {
        fs::create_dir_all(self.output_root()).unwrap();
        fs::write(self.snapshot_path(), state.to_json_pretty().unwrap()).unwrap();
    }

    pub fn report(&self) -> String {
        fs::read_to_string(self.report_path()).unwrap()
    }
}
