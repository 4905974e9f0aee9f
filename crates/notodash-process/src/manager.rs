//! Process manager

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::{
    child::{ManagedChild, ProcessOutput},
    config::ProcessConfig,
    error::{ProcessError, Result},
};

/// Spawns external tools with captured output
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessManager;

impl ProcessManager {
    /// Create new process manager
    pub fn new() -> Self {
        Self
    }

    /// Spawn a managed process
    ///
    /// stdin is closed; stdout and stderr are piped. On Unix the child leads
    /// its own process group so a timeout can take down everything it started.
    pub async fn spawn(&self, config: ProcessConfig) -> Result<ManagedChild> {
        debug!(
            command = %config.command,
            args = ?config.args,
            "Spawning process"
        );

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);

        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: config.command.clone(),
            source,
        })?;

        info!(pid = ?child.id(), command = %config.command, "Process spawned");

        Ok(ManagedChild::new(child, config))
    }

    /// Spawn a process and wait for it to finish
    ///
    /// A non-zero exit is not an error here; use [`ProcessOutput::check`].
    ///
    /// # Examples
    /// ```no_run
    /// use notodash_process::{ProcessManager, ProcessConfig};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let output = ProcessManager::new()
    ///     .run(ProcessConfig::new("gftools").args(["builder", "config.yaml"]))
    ///     .await?
    ///     .check()?;
    /// print!("{}", output.stdout);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, config: ProcessConfig) -> Result<ProcessOutput> {
        self.spawn(config).await?.wait_with_output().await
    }
}
