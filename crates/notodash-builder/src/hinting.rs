//! Hinting collaborator and artifact hooks

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notodash_process::{ProcessConfig, ProcessManager};
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::options::BuildOptions;

/// Autohints a TrueType font
#[async_trait]
pub trait Hinter: Send + Sync {
    /// Write a hinted copy of `input` to `output`
    async fn hint(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Runs `ttfautohint <in> <out>`
#[derive(Debug, Clone)]
pub struct TtfautohintHinter {
    program: String,
    timeout: Duration,
    process: ProcessManager,
}

impl TtfautohintHinter {
    /// Use `ttfautohint` from `PATH`
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("ttfautohint", timeout)
    }

    /// Use a specific executable
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            process: ProcessManager::new(),
        }
    }
}

#[async_trait]
impl Hinter for TtfautohintHinter {
    async fn hint(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(input = %input.display(), output = %output.display(), "Autohinting");
        self.process
            .run(
                ProcessConfig::new(&self.program)
                    .arg(input.display().to_string())
                    .arg(output.display().to_string())
                    .timeout(self.timeout),
            )
            .await?
            .check()?;
        Ok(())
    }
}

/// Extension point run on each artifact a build stage produced
#[async_trait]
pub trait ArtifactHook: Send + Sync {
    /// Process one artifact; returns any additional file it produced
    async fn process(&self, artifact: &Path, options: &BuildOptions) -> Result<Option<PathBuf>>;
}

/// Hints every unhinted static TTF into the `hinted` tree
pub struct HintingHook {
    hinter: Arc<dyn Hinter>,
}

impl HintingHook {
    /// Create a hook around a hinter
    pub fn new(hinter: Arc<dyn Hinter>) -> Self {
        Self { hinter }
    }
}

#[async_trait]
impl ArtifactHook for HintingHook {
    async fn process(&self, artifact: &Path, options: &BuildOptions) -> Result<Option<PathBuf>> {
        let Some(hinted) = options.hinted_path(artifact) else {
            return Ok(None);
        };

        let hinted_dir = hinted.parent().ok_or_else(|| BuildError::Layout {
            path: hinted.clone(),
        })?;
        tokio::fs::create_dir_all(hinted_dir)
            .await
            .map_err(|e| BuildError::io(hinted_dir, e))?;

        self.hinter.hint(artifact, &hinted).await?;
        Ok(Some(hinted))
    }
}
