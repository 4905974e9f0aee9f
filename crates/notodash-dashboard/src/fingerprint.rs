//! Source fingerprints

use std::path::Path;
use std::sync::Mutex;

use notodash_vcs::GitRepository;
use tracing::debug;

use crate::error::{DashboardError, Result};

/// Computes the fingerprint of a source file
pub trait FingerprintSource: Send + Sync {
    /// Reference string for the latest change to `path`
    fn fingerprint(&self, path: &Path) -> Result<String>;
}

/// Fingerprints from the git history of the repository holding the sources
pub struct GitFingerprints {
    repository: Mutex<GitRepository>,
}

impl GitFingerprints {
    /// Wrap an open repository
    pub fn new(repository: GitRepository) -> Self {
        Self {
            repository: Mutex::new(repository),
        }
    }

    /// Find the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self> {
        Ok(Self::new(GitRepository::discover(path)?))
    }
}

impl FingerprintSource for GitFingerprints {
    fn fingerprint(&self, path: &Path) -> Result<String> {
        let repository = self.repository.lock().map_err(|_| DashboardError::Fingerprint {
            path: path.to_path_buf(),
            message: "repository lock poisoned".to_string(),
        })?;

        let reference = repository
            .last_change(path)
            .map_err(|e| DashboardError::Fingerprint {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .reference();
        debug!(path = %path.display(), fingerprint = %reference, "Computed fingerprint");
        Ok(reference)
    }
}
