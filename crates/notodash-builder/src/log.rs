//! Per-family build log

use std::path::Path;

use crate::error::{BuildError, Result};

/// Text log of one build attempt, written to `<output>/<family>/build.log`
#[derive(Debug, Clone, Default)]
pub struct BuildLog {
    text: String,
}

impl BuildLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a titled section
    pub fn section(&mut self, title: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str("## ");
        self.text.push_str(title);
        self.text.push('\n');
    }

    /// Append captured tool output
    pub fn append(&mut self, output: &str) {
        self.text.push_str(output);
        if !output.is_empty() && !output.ends_with('\n') {
            self.text.push('\n');
        }
    }

    /// Record a recovered error as a single line
    pub fn error(&mut self, message: impl std::fmt::Display) {
        let message = message.to_string().replace('\n', " ");
        self.text.push_str("ERROR: ");
        self.text.push_str(&message);
        self.text.push('\n');
    }

    /// Log text so far
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Overwrite `path` with the log
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, &self.text)
            .await
            .map_err(|e| BuildError::io(path, e))
    }
}
