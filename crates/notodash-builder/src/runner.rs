//! One project, end to end

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notodash_core::{is_qa_eligible, BuildResult, Project};
use tracing::{debug, info, warn};

use crate::fontbakery::{QaChecker, QaRequest};
use crate::log::BuildLog;
use crate::options::BuildOptions;
use crate::project::{BuildOutcome, FontProjectBuilder};

/// Builds, checks and summarises one project
///
/// Never fails: every problem ends up either in the result's `errors` field
/// (static build failure) or in the family's build log.
pub struct ProjectBuildRunner {
    builder: FontProjectBuilder,
    qa: Arc<dyn QaChecker>,
    output_root: PathBuf,
}

impl ProjectBuildRunner {
    /// Create a runner writing below `output_root`
    pub fn new(
        builder: FontProjectBuilder,
        qa: Arc<dyn QaChecker>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            builder,
            qa,
            output_root: output_root.into(),
        }
    }

    /// Output tree root
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Build options for a project under this runner's output root
    pub fn options_for(&self, project: &Project) -> BuildOptions {
        BuildOptions::for_family(&project.family, project.sources.clone(), &self.output_root)
    }

    /// Run the build, QA and badge collection for `project`
    pub async fn run(&self, project: &Project) -> BuildResult {
        let options = self.options_for(project);
        info!(family = %project.family, "Building project");

        let mut outcome = match tokio::fs::create_dir_all(&options.family_dir).await {
            Ok(()) => self.builder.build(&options).await,
            Err(e) => {
                warn!(family = %project.family, error = %e, "Couldn't create family directory");
                BuildOutcome {
                    error: Some(format!(
                        "Cannot create {}: {}",
                        options.family_dir.display(),
                        e
                    )),
                    ..Default::default()
                }
            }
        };

        let outputs = self.relative_outputs(&outcome);
        let badges_dir = options.family_dir.join("badges");
        if let Err(e) = tokio::fs::create_dir_all(&badges_dir).await {
            warn!(dir = %badges_dir.display(), error = %e, "Couldn't create badges directory");
        }
        let qa_report = self
            .run_qa(&options, &badges_dir, &outputs, &mut outcome.log)
            .await;
        let badges = self.collect_badges(&badges_dir);

        if let Err(e) = outcome.log.write_to(&options.log_path()).await {
            warn!(family = %project.family, error = %e, "Couldn't write build log");
        }

        let mut result = BuildResult::new(&project.family)
            .with_fingerprint(project.fingerprint.clone())
            .with_badges(badges)
            .with_outputs(outputs);
        if let Some(error) = outcome.error {
            result = result.with_error(error);
        }
        if let Some(report) = qa_report {
            result = result.with_qa_report(report);
        }
        result
    }

    async fn run_qa(
        &self,
        options: &BuildOptions,
        badges_dir: &Path,
        outputs: &[String],
        log: &mut BuildLog,
    ) -> Option<String> {
        let mut eligible: Vec<&String> = outputs.iter().filter(|p| is_qa_eligible(p)).collect();
        eligible.sort();
        if eligible.is_empty() {
            debug!(family = %options.family_name, "No QA-eligible outputs");
            return None;
        }

        let request = QaRequest {
            html_report: options.family_dir.join("fontbakery-report.html"),
            badges_dir: badges_dir.to_path_buf(),
            fonts: eligible
                .iter()
                .map(|relative| self.output_root.join(relative.as_str()))
                .collect(),
        };

        log.section("qa");
        match self.qa.check(&request).await {
            Ok(transcript) => log.append(&transcript),
            Err(e) => {
                warn!(family = %options.family_name, error = %e, "QA run failed");
                log.error(format!("QA run failed: {}", e));
            }
        }

        Some(format!("{}/fontbakery-report.html", options.family_name))
    }

    fn collect_badges(&self, badges_dir: &Path) -> Vec<String> {
        let pattern = format!(
            "{}/*.json",
            glob::Pattern::escape(&badges_dir.display().to_string())
        );
        let mut badges: Vec<String> = match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(|entry| entry.ok())
                .filter_map(|path| self.relative(&path))
                .collect(),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid badge pattern");
                Vec::new()
            }
        };
        badges.sort();
        badges
    }

    fn relative_outputs(&self, outcome: &BuildOutcome) -> Vec<String> {
        outcome
            .outputs
            .iter()
            .filter_map(|path| self.relative(path))
            .collect()
    }

    /// Path below the output root with `/` separators
    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.output_root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}
