//! Hook-configured project builds

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::gftools::{BuildStage, FontBuilder, StageReport};
use crate::hinting::ArtifactHook;
use crate::log::BuildLog;
use crate::options::BuildOptions;

/// Everything one project build attempt produced
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Produced files, including hook outputs
    pub outputs: BTreeSet<PathBuf>,
    /// Static build failure, if any
    pub error: Option<String>,
    /// Transcript of the attempt
    pub log: BuildLog,
}

impl BuildOutcome {
    /// Whether the static build failed
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Builds one project through a [`FontBuilder`]
///
/// The variable stage runs first and its failure is only logged. A static
/// stage failure becomes the outcome's error. Artifacts of each stage are
/// passed to the matching hook; hook failures are logged and the original
/// artifact is kept.
pub struct FontProjectBuilder {
    builder: Arc<dyn FontBuilder>,
    post_artifact: Option<Arc<dyn ArtifactHook>>,
    post_variable: Option<Arc<dyn ArtifactHook>>,
}

impl FontProjectBuilder {
    /// Create a builder without hooks
    pub fn new(builder: Arc<dyn FontBuilder>) -> Self {
        Self {
            builder,
            post_artifact: None,
            post_variable: None,
        }
    }

    /// Hook run on each static artifact
    pub fn with_post_artifact(mut self, hook: Arc<dyn ArtifactHook>) -> Self {
        self.post_artifact = Some(hook);
        self
    }

    /// Hook run on each variable artifact
    pub fn with_post_variable(mut self, hook: Arc<dyn ArtifactHook>) -> Self {
        self.post_variable = Some(hook);
        self
    }

    /// Run the enabled stages for `options`
    pub async fn build(&self, options: &BuildOptions) -> BuildOutcome {
        let mut outcome = BuildOutcome::default();

        if options.build_variable {
            outcome.log.section("variable build");
            match self.builder.build(options, BuildStage::Variable).await {
                Ok(report) => {
                    self.absorb(report, self.post_variable.as_deref(), options, &mut outcome)
                        .await
                }
                Err(e) => {
                    warn!(family = %options.family_name, error = %e, "Couldn't build variable font");
                    outcome
                        .log
                        .error(format!("Couldn't build variable font: {}", e));
                }
            }
        }

        outcome.log.section("static build");
        match self.builder.build(options, BuildStage::Static).await {
            Ok(report) => {
                self.absorb(report, self.post_artifact.as_deref(), options, &mut outcome)
                    .await
            }
            Err(e) => {
                warn!(family = %options.family_name, error = %e, "Build failed");
                outcome.log.error(format!("Build failed: {}", e));
                outcome.error = Some(e.to_string());
            }
        }

        info!(
            family = %options.family_name,
            outputs = outcome.outputs.len(),
            failed = outcome.is_failed(),
            "Project build finished"
        );
        outcome
    }

    async fn absorb(
        &self,
        report: StageReport,
        hook: Option<&dyn ArtifactHook>,
        options: &BuildOptions,
        outcome: &mut BuildOutcome,
    ) {
        outcome.log.append(&report.transcript);

        for artifact in report.outputs {
            if let Some(hook) = hook {
                match hook.process(&artifact, options).await {
                    Ok(Some(extra)) => {
                        outcome.outputs.insert(extra);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(artifact = %artifact.display(), error = %e, "Post-processing failed");
                        outcome.log.error(format!(
                            "Couldn't post-process {}: {}",
                            artifact.display(),
                            e
                        ));
                    }
                }
            }
            outcome.outputs.insert(artifact);
        }
    }
}
