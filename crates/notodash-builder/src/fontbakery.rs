//! QA collaborator: fontbakery

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use notodash_process::{ProcessConfig, ProcessManager};
use tracing::{debug, info};

use crate::error::Result;

/// One QA invocation for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaRequest {
    /// HTML report destination
    pub html_report: PathBuf,
    /// Directory receiving JSON badge files
    pub badges_dir: PathBuf,
    /// Fonts to check
    pub fonts: Vec<PathBuf>,
}

/// Checks fonts and writes a report
///
/// The checker's verdict is not part of the result: only whether it could be
/// run at all. The report and badges are inspected by readers afterwards.
#[async_trait]
pub trait QaChecker: Send + Sync {
    /// Run the checks, returning captured output for the build log
    async fn check(&self, request: &QaRequest) -> Result<String>;
}

/// Runs `fontbakery check-notofonts`
#[derive(Debug, Clone)]
pub struct FontbakeryChecker {
    program: String,
    profile: String,
    excluded_checks: Vec<String>,
    timeout: Duration,
    process: ProcessManager,
}

impl FontbakeryChecker {
    /// Use `fontbakery` from `PATH` with the Noto profile
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("fontbakery", timeout)
    }

    /// Use a specific executable
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            profile: "check-notofonts".to_string(),
            excluded_checks: vec!["com.google.fonts/check/family/single_directory".to_string()],
            timeout,
            process: ProcessManager::new(),
        }
    }

    /// Command-line arguments for a request
    pub fn arguments(&self, request: &QaRequest) -> Vec<String> {
        let mut args = vec![
            self.profile.clone(),
            "-l".to_string(),
            "INFO".to_string(),
            "-n".to_string(),
        ];
        for check in &self.excluded_checks {
            args.push("-x".to_string());
            args.push(check.clone());
        }
        args.push("--html".to_string());
        args.push(request.html_report.display().to_string());
        args.push("--badges".to_string());
        args.push(format!("{}/", request.badges_dir.display()));
        args.extend(request.fonts.iter().map(|font| font.display().to_string()));
        args
    }
}

#[async_trait]
impl QaChecker for FontbakeryChecker {
    async fn check(&self, request: &QaRequest) -> Result<String> {
        debug!(fonts = request.fonts.len(), report = %request.html_report.display(), "Running fontbakery");
        let output = self
            .process
            .run(
                ProcessConfig::new(&self.program)
                    .args(self.arguments(request))
                    .timeout(self.timeout),
            )
            .await?;

        info!(status = %output.status, "fontbakery finished");
        Ok(output.transcript())
    }
}
