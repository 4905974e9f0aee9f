//! Managed child process wrapper

use std::process::ExitStatus;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::ProcessConfig,
    error::{ProcessError, Result},
};

/// Grace period between SIGTERM and SIGKILL
const SIGKILL_TIMEOUT_MS: u64 = 200;

/// Lines of stderr kept in failure messages
const STDERR_TAIL_LINES: usize = 20;

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Command line that produced this output
    pub command: String,
    /// Exit status
    pub status: ExitStatus,
    /// Captured stdout (lossy UTF-8)
    pub stdout: String,
    /// Captured stderr (lossy UTF-8)
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Turn a non-zero exit into [`ProcessError::Failed`]
    pub fn check(self) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(ProcessError::Failed {
            command: self.command.clone(),
            status: self.status.to_string(),
            stderr_tail: self.stderr_tail(),
        })
    }

    /// Last few stderr lines, or stdout when stderr is empty
    pub fn stderr_tail(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = text.trim_end().lines().collect();
        let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
        lines[start..].join("\n")
    }

    /// Log transcript: command line followed by both streams
    pub fn transcript(&self) -> String {
        let mut text = format!("$ {}\n", self.command);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        if !self.stderr.is_empty() && !self.stderr.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!("[{}]\n", self.status));
        text
    }
}

/// Wrapper around tokio::process::Child with timeout and tree kill
pub struct ManagedChild {
    child: Child,
    config: ProcessConfig,
    pid: u32,
}

impl ManagedChild {
    pub(crate) fn new(child: Child, config: ProcessConfig) -> Self {
        let pid = child.id().unwrap_or(0);
        Self { child, config, pid }
    }

    /// Get process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get process configuration
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Wait for exit while draining both streams
    ///
    /// When the configured timeout elapses the whole process group is killed
    /// and [`ProcessError::Timeout`] is returned.
    pub async fn wait_with_output(mut self) -> Result<ProcessOutput> {
        let command = self.config.display();

        let collected = match self.config.timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, collect(&mut self.child)).await {
                    Ok(collected) => collected,
                    Err(_) => {
                        warn!(pid = %self.pid, command = %command, "Process timed out");
                        self.kill_tree().await?;
                        return Err(ProcessError::Timeout {
                            command,
                            seconds: timeout.as_secs(),
                        });
                    }
                }
            }
            None => collect(&mut self.child).await,
        };

        let (status, stdout, stderr) = collected.map_err(|source| ProcessError::WaitFailed {
            command: command.clone(),
            source,
        })?;

        debug!(pid = %self.pid, status = %status, "Process exited");

        Ok(ProcessOutput {
            command,
            status,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    /// Kill process tree (process and all descendants)
    ///
    /// - Unix: SIGTERM then SIGKILL to the process group
    /// - Elsewhere: kill the direct child only
    pub async fn kill_tree(&mut self) -> Result<()> {
        debug!(pid = %self.pid, "Killing process tree");

        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            let pgid = Pid::from_raw(self.pid as i32);

            if let Err(e) = killpg(pgid, Signal::SIGTERM) {
                warn!(pid = %self.pid, error = %e, "Failed to send SIGTERM, trying process only");
                let _ = self.child.start_kill();
            }

            sleep(Duration::from_millis(SIGKILL_TIMEOUT_MS)).await;

            if let Err(e) = killpg(pgid, Signal::SIGKILL) {
                debug!(pid = %self.pid, error = %e, "Process group already gone");
            }
        }

        #[cfg(not(unix))]
        {
            self.child
                .start_kill()
                .map_err(|e| ProcessError::KillFailed(e.to_string()))?;
            sleep(Duration::from_millis(SIGKILL_TIMEOUT_MS)).await;
        }

        self.child
            .wait()
            .await
            .map_err(|e| ProcessError::KillFailed(e.to_string()))?;
        Ok(())
    }
}

async fn collect(child: &mut Child) -> std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (stdout, stderr, status) = tokio::join!(read_all(stdout), read_all(stderr), child.wait());
    Ok((status?, stdout?, stderr?))
}

async fn read_all<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ProcessManager;

    #[tokio::test]
    async fn test_output_captured() {
        let manager = ProcessManager::new();
        let config = ProcessConfig::new("sh").args(["-c", "echo built; echo warned >&2"]);

        let output = manager.run(config).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "built\n");
        assert_eq!(output.stderr, "warned\n");
        assert!(output.transcript().starts_with("$ sh -c"));
    }

    #[tokio::test]
    async fn test_failure_check() {
        let manager = ProcessManager::new();
        let config = ProcessConfig::new("sh").args(["-c", "echo 'no masters' >&2; exit 3"]);

        let output = manager.run(config).await.unwrap();
        assert!(!output.success());
        match output.check() {
            Err(ProcessError::Failed { stderr_tail, .. }) => assert_eq!(stderr_tail, "no masters"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let manager = ProcessManager::new();
        let config = ProcessConfig::new("sleep")
            .args(["30"])
            .timeout(Duration::from_millis(100));

        let started = std::time::Instant::now();
        let result = manager.run(config).await;
        assert!(matches!(result, Err(ProcessError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
