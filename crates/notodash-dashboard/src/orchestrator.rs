//! Whole-run sequencing

use std::collections::BTreeMap;
use std::sync::Arc;

use notodash_builder::ProjectBuildRunner;
use notodash_core::{IssueRecord, PersistedState};
use notodash_github::IssueTracker;
use notodash_storage::{DashboardConfig, ReportData, ReportRenderer, StateStore};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::change::ChangeDetector;
use crate::discovery::{Collision, ProjectScanner};
use crate::error::{DashboardError, Result};
use crate::fingerprint::FingerprintSource;
use crate::issues::IssueCorrelator;
use crate::selector::{BuildSelector, Selection};

/// Collaborators a run talks to
pub struct DashboardServices {
    pub fingerprints: Arc<dyn FingerprintSource>,
    pub runner: ProjectBuildRunner,
    pub tracker: Arc<dyn IssueTracker>,
    pub store: StateStore,
    pub renderer: ReportRenderer,
}

/// What a run would build, without building it
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub state: PersistedState,
    pub selection: Selection,
}

/// Figures of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Families built this run, in build order
    pub selected: Vec<String>,
    pub built: usize,
    /// Families whose build step failed
    pub failed: Vec<String>,
    /// Changed families deferred by the per-run cap
    pub truncated: usize,
    pub skipped_denylisted: Vec<String>,
    pub collisions: Vec<Collision>,
    /// Script keys found on open issues
    pub issues_indexed: usize,
}

/// Runs the incremental dashboard pipeline
pub struct Dashboard {
    config: DashboardConfig,
    services: DashboardServices,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, services: DashboardServices) -> Self {
        Self { config, services }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Load state, discover and select
    pub async fn plan(&self) -> Result<RunPlan> {
        let state = self.services.store.load().await;
        let selection = self.select(&state)?;
        Ok(RunPlan { state, selection })
    }

    /// Run the full pipeline
    ///
    /// Per-project failures end up in the results. Only an unusable output
    /// root, a failed discovery and a failed final publish abort the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let output_root = &self.config.output_root;
        tokio::fs::create_dir_all(output_root)
            .await
            .map_err(|source| DashboardError::OutputRoot {
                path: output_root.clone(),
                source,
            })?;

        let RunPlan {
            mut state,
            selection,
        } = self.plan().await?;

        let mut summary = RunSummary {
            selected: selection.families(),
            truncated: selection.truncated(),
            skipped_denylisted: selection.skipped_denylisted.clone(),
            collisions: selection.collisions.clone(),
            ..Default::default()
        };

        for project in &selection.queue {
            let result = self.services.runner.run(project).await;
            if result.is_failed() {
                summary.failed.push(result.family.clone());
            }
            summary.built += 1;
            state.record(result);

            if let Err(e) = self.services.store.persist(&state).await {
                warn!(family = %project.family, error = %e, "Couldn't checkpoint state");
            }
        }

        let correlator = IssueCorrelator::new(
            Arc::clone(&self.services.tracker),
            self.config.issue_label_prefix.as_str(),
        );
        let (index, issues) = correlator.correlate(&state).await;
        summary.issues_indexed = index.len();

        if let Err(e) = self.publish(&state, &issues).await {
            error!(error = %e, "Couldn't publish results");
            return Err(e);
        }

        info!(
            built = summary.built,
            failed = summary.failed.len(),
            truncated = summary.truncated,
            "Run finished"
        );
        Ok(summary)
    }

    fn select(&self, state: &PersistedState) -> Result<Selection> {
        let discovery = ProjectScanner::new(&self.config.source_root).discover()?;
        let selector = BuildSelector::new(
            ChangeDetector::new(Arc::clone(&self.services.fingerprints)),
            self.config.denylist.iter().cloned(),
            self.config.max_build,
        );
        Ok(selector.select(discovery, state))
    }

    async fn publish(
        &self,
        state: &PersistedState,
        issues: &BTreeMap<String, Vec<IssueRecord>>,
    ) -> Result<()> {
        self.services.store.persist(state).await?;

        let data = ReportData::new(
            state,
            issues,
            &self.config.commit_url,
            &self.config.issue_repository,
        );
        self.services
            .renderer
            .write(&data, &self.config.report_path)
            .await?;
        Ok(())
    }
}
