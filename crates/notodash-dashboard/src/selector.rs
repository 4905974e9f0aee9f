//! Build queue selection

use std::collections::BTreeSet;

use notodash_core::{PersistedState, Project};
use tracing::{debug, info, warn};

use crate::change::ChangeDetector;
use crate::discovery::{Collision, Discovery};

/// Projects to build this run
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Changed projects in discovery order, at most `max_build` of them
    pub queue: Vec<Project>,
    /// Number of changed projects before truncation
    pub changed_total: usize,
    /// Discovered families excluded by the denylist
    pub skipped_denylisted: Vec<String>,
    /// Sources left out because their family name was already taken
    pub collisions: Vec<Collision>,
}

impl Selection {
    /// Changed projects deferred to a later run by the cap
    pub fn truncated(&self) -> usize {
        self.changed_total - self.queue.len()
    }

    pub fn families(&self) -> Vec<String> {
        self.queue.iter().map(|project| project.family.clone()).collect()
    }
}

/// Chooses which discovered projects to rebuild
pub struct BuildSelector {
    detector: ChangeDetector,
    denylist: BTreeSet<String>,
    max_build: usize,
}

impl BuildSelector {
    pub fn new<I, S>(detector: ChangeDetector, denylist: I, max_build: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            detector,
            denylist: denylist.into_iter().map(Into::into).collect(),
            max_build,
        }
    }

    /// Select changed, non-denylisted projects, then cap the queue
    ///
    /// The whole discovery is examined before truncating. A project whose
    /// fingerprint cannot be computed is selected without one so that it is
    /// retried on every run until the lookup succeeds.
    pub fn select(&self, discovery: Discovery, state: &PersistedState) -> Selection {
        let mut selection = Selection {
            collisions: discovery.collisions,
            ..Default::default()
        };

        for project in discovery.projects {
            if self.denylist.contains(&project.family) {
                debug!(family = %project.family, "Skipping denylisted family");
                selection.skipped_denylisted.push(project.family);
                continue;
            }

            let recorded = state
                .get(&project.family)
                .and_then(|entry| entry.fingerprint.as_deref());
            match self.detector.check(project.primary_source(), recorded) {
                Ok(check) if check.needs_build => {
                    debug!(family = %project.family, fingerprint = %check.fingerprint, "Project changed");
                    selection.queue.push(project.with_fingerprint(Some(check.fingerprint)));
                }
                Ok(_) => {
                    debug!(family = %project.family, "Project unchanged");
                }
                Err(e) => {
                    warn!(family = %project.family, error = %e, "Fingerprint lookup failed, selecting for rebuild");
                    selection.queue.push(project.with_fingerprint(None));
                }
            }
        }

        selection.changed_total = selection.queue.len();
        selection.queue.truncate(self.max_build);

        info!(
            selected = selection.queue.len(),
            changed = selection.changed_total,
            truncated = selection.truncated(),
            denylisted = selection.skipped_denylisted.len(),
            "Selected projects"
        );
        selection
    }
}
