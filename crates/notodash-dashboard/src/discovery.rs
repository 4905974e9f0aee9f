//! Project discovery in the source tree

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use notodash_core::Project;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DashboardError, Result};

/// Source patterns relative to the source root
const SOURCE_PATTERNS: [&str; 2] = ["*.glyphs", "*/*.designspace"];

/// Two sources deriving the same family name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub family: String,
    /// Source that owns the family
    pub kept: PathBuf,
    /// Source left out of this run
    pub ignored: PathBuf,
}

/// Projects found by a scan, sorted by source path
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub projects: Vec<Project>,
    pub collisions: Vec<Collision>,
}

/// Finds font projects below a source root
pub struct ProjectScanner {
    source_root: PathBuf,
}

impl ProjectScanner {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Scan for single-file and directory-grouped sources
    ///
    /// Every source becomes one project. When two sources derive the same
    /// family name, the one sorting first keeps it and the other is reported
    /// as a collision.
    pub fn discover(&self) -> Result<Discovery> {
        if !self.source_root.is_dir() {
            return Err(DashboardError::Discovery {
                path: self.source_root.clone(),
                message: "not a directory".to_string(),
            });
        }

        let mut sources = Vec::new();
        for pattern in SOURCE_PATTERNS {
            sources.extend(self.glob(pattern)?);
        }
        sources.sort();
        sources.dedup();

        let mut owners: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut discovery = Discovery::default();
        for source in sources {
            let project = match Project::from_sources([source.clone()]) {
                Ok(project) => project,
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "Skipping source without a family name");
                    continue;
                }
            };

            if let Some(kept) = owners.get(&project.family) {
                warn!(
                    family = %project.family,
                    kept = %kept.display(),
                    ignored = %source.display(),
                    "Family name collision"
                );
                discovery.collisions.push(Collision {
                    family: project.family,
                    kept: kept.clone(),
                    ignored: source,
                });
                continue;
            }

            debug!(family = %project.family, path = %source.display(), "Discovered project");
            owners.insert(project.family.clone(), source);
            discovery.projects.push(project);
        }

        info!(
            projects = discovery.projects.len(),
            collisions = discovery.collisions.len(),
            "Discovery finished"
        );
        Ok(discovery)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&self.source_root.display().to_string()),
            pattern
        );
        let paths = glob::glob(&full).map_err(|e| DashboardError::Discovery {
            path: self.source_root.clone(),
            message: e.to_string(),
        })?;

        Ok(paths
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, "Unreadable path during discovery");
                    None
                }
            })
            .collect())
    }
}
