//! Git repository implementation

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, TimeZone};
use git2::{Commit, Oid, Repository as Git2Repository};
use tracing::{debug, trace};

use crate::{
    commit::CommitReference,
    error::{Result, VcsError},
};

/// Git repository wrapper
pub struct GitRepository {
    repo: Git2Repository,
    root_path: PathBuf,
}

impl GitRepository {
    /// Open a Git repository at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening Git repository at: {}", path.display());

        let repo = Git2Repository::open(path).map_err(|e| {
            debug!("Failed to open repository: {}", e);
            VcsError::RepositoryNotFound {
                path: path.display().to_string(),
            }
        })?;

        Self::from_git2(repo)
    }

    /// Discover a Git repository starting from the given path
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Discovering Git repository from: {}", path.display());

        let repo = Git2Repository::discover(path).map_err(|e| {
            debug!("Failed to discover repository: {}", e);
            VcsError::RepositoryNotFound {
                path: path.display().to_string(),
            }
        })?;

        Self::from_git2(repo)
    }

    fn from_git2(repo: Git2Repository) -> Result<Self> {
        let workdir = repo.workdir().ok_or_else(|| VcsError::InvalidState {
            message: "Repository has no working directory".to_string(),
        })?;
        let root_path = workdir.canonicalize()?;

        debug!("Using Git repository at: {}", root_path.display());

        Ok(Self { repo, root_path })
    }

    /// Check if a directory is inside a Git repository
    pub fn is_git_repository<P: AsRef<Path>>(path: P) -> bool {
        Git2Repository::discover(path).is_ok()
    }

    /// Repository working tree root
    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Path of a file relative to the working tree root
    ///
    /// Relative inputs are resolved against the current directory.
    pub fn relative_path<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let absolute = path.canonicalize().map_err(|_| VcsError::FileNotFound {
            path: path.display().to_string(),
        })?;

        absolute
            .strip_prefix(&self.root_path)
            .map(Path::to_path_buf)
            .map_err(|_| VcsError::OutsideRepository {
                path: path.display().to_string(),
            })
    }

    /// Find the most recent commit that changed `path`, as `git log -1` would
    ///
    /// Starting at HEAD, history is simplified the way `git log` does it: a
    /// commit whose blob for `path` equals that of one of its parents is
    /// skipped, and only the first such parent is followed. The first commit
    /// that differs from all of its parents (or has none) is the change.
    /// Renames are not followed.
    pub fn last_change<P: AsRef<Path>>(&self, path: P) -> Result<CommitReference> {
        let path = path.as_ref();
        let relative = self.relative_path(path)?;

        let mut commit = self.repo.head()?.peel_to_commit()?;
        let Some(blob) = blob_at(&commit, &relative) else {
            return Err(VcsError::FileNotFound {
                path: path.display().to_string(),
            });
        };

        loop {
            let same_parent = commit
                .parents()
                .find(|parent| blob_at(parent, &relative) == Some(blob));

            match same_parent {
                Some(parent) => commit = parent,
                None => {
                    trace!(path = %relative.display(), commit = %commit.id(), "Found last change");
                    return to_reference(&commit);
                }
            }
        }
    }
}

fn blob_at(commit: &Commit<'_>, relative: &Path) -> Option<Oid> {
    commit
        .tree()
        .ok()?
        .get_path(relative)
        .ok()
        .map(|entry| entry.id())
}

fn to_reference(commit: &Commit<'_>) -> Result<CommitReference> {
    let short_id = commit
        .as_object()
        .short_id()?
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| commit.id().to_string()[..7].to_string());

    let when = commit.author().when();
    let date = FixedOffset::east_opt(when.offset_minutes() * 60)
        .or_else(|| FixedOffset::east_opt(0))
        .and_then(|offset| offset.timestamp_opt(when.seconds(), 0).single())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    Ok(CommitReference {
        id: commit.id().to_string(),
        short_id,
        summary: commit.summary().unwrap_or_default().to_string(),
        date,
    })
}
