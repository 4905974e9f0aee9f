//! Persisted state: best-effort load, atomic persist

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notodash_core::{PersistedState, SnapshotLoad};
use notodash_http::HttpClientTrait;
use tracing::{debug, info, warn};

use crate::error::{IoOperation, StorageError, StorageResult};

/// Owns the snapshot's location for one run
///
/// Reads come from the published URL when one is configured and from the
/// local snapshot otherwise; writes always go to the local snapshot.
pub struct StateStore {
    snapshot_path: PathBuf,
    snapshot_url: Option<String>,
    http: Option<Arc<dyn HttpClientTrait>>,
}

impl StateStore {
    /// Store reading and writing the local snapshot only
    pub fn local(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            snapshot_url: None,
            http: None,
        }
    }

    /// Read from `url` through `http` instead of the local snapshot
    pub fn with_remote(mut self, url: impl Into<String>, http: Arc<dyn HttpClientTrait>) -> Self {
        self.snapshot_url = Some(url.into());
        self.http = Some(http);
        self
    }

    /// Local snapshot path
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Load prior state, substituting empty state on any failure
    pub async fn load(&self) -> PersistedState {
        match self.try_load().await {
            Ok(load) => {
                if !load.undecoded.is_empty() {
                    warn!(
                        undecoded = ?load.undecoded,
                        "Keeping undecodable snapshot entries as is; those families will be rebuilt"
                    );
                }
                info!(families = load.state.len(), "Loaded prior state");
                load.state
            }
            Err(e) => {
                warn!(error = %e, "Couldn't load prior state, starting empty");
                PersistedState::new()
            }
        }
    }

    /// Load prior state, reporting why it is unavailable
    pub async fn try_load(&self) -> StorageResult<SnapshotLoad> {
        let (source_name, content) = match (&self.snapshot_url, &self.http) {
            (Some(url), Some(http)) => {
                debug!(url = %url, "Fetching published snapshot");
                let content = http
                    .get_text(url)
                    .await
                    .map_err(|e| StorageError::snapshot_unavailable(url.as_str(), e.to_string()))?;
                (url.clone(), content)
            }
            _ => {
                let path = self.snapshot_path.display().to_string();
                debug!(path = %path, "Reading local snapshot");
                let content = tokio::fs::read_to_string(&self.snapshot_path)
                    .await
                    .map_err(|e| StorageError::snapshot_unavailable(path.as_str(), e.to_string()))?;
                (path, content)
            }
        };

        PersistedState::from_json_lenient(&content)
            .map_err(|e| StorageError::snapshot_unavailable(source_name, e.to_string()))
    }

    /// Write the state to the local snapshot
    ///
    /// The document goes to a sibling temporary file first and is renamed into
    /// place, so readers never see a partial snapshot.
    pub async fn persist(&self, state: &PersistedState) -> StorageResult<()> {
        let json = state
            .to_json_pretty()
            .map_err(|e| StorageError::Internal(format!("Failed to serialize state: {}", e)))?;

        if let Some(parent) = self.snapshot_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::directory_creation_failed(parent.to_path_buf(), e))?;
        }

        let temp_path = temp_sibling(&self.snapshot_path);
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| StorageError::io_error(temp_path.clone(), IoOperation::Write, e))?;
        tokio::fs::rename(&temp_path, &self.snapshot_path)
            .await
            .map_err(|e| StorageError::io_error(self.snapshot_path.clone(), IoOperation::Move, e))?;

        debug!(path = %self.snapshot_path.display(), families = state.len(), "Persisted state");
        Ok(())
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "state.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
