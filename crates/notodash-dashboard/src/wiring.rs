//! Production collaborators

use std::sync::Arc;

use notodash_builder::{
    FontProjectBuilder, FontbakeryChecker, GftoolsBuilder, HintingHook, ProjectBuildRunner,
    TtfautohintHinter,
};
use notodash_github::{GitHubConfig, GitHubIssueTracker};
use notodash_http::shared_client;
use notodash_storage::{DashboardConfig, ReportRenderer, StateStore};

use crate::error::Result;
use crate::fingerprint::GitFingerprints;
use crate::orchestrator::DashboardServices;

/// `gftools builder` with `ttfautohint` hinting every static TTF
pub fn font_project_builder(config: &DashboardConfig) -> FontProjectBuilder {
    let timeout = config.tool_timeout();
    let hinting = HintingHook::new(Arc::new(TtfautohintHinter::new(timeout)));
    FontProjectBuilder::new(Arc::new(GftoolsBuilder::new(timeout)))
        .with_post_artifact(Arc::new(hinting))
}

/// Runner adding `fontbakery` QA to [`font_project_builder`]
pub fn project_runner(config: &DashboardConfig) -> ProjectBuildRunner {
    ProjectBuildRunner::new(
        font_project_builder(config),
        Arc::new(FontbakeryChecker::new(config.tool_timeout())),
        config.output_root.clone(),
    )
}

/// Wire git, the external tools, GitHub and the snapshot store for `config`
pub fn production_services(config: &DashboardConfig) -> Result<DashboardServices> {
    let fingerprints = GitFingerprints::discover(&config.source_root)?;

    let tracker = GitHubIssueTracker::new(
        GitHubConfig::new(config.issue_repository.as_str())
            .with_token(config.github_token.clone())
            .with_timeout(config.http_timeout()),
    )?;

    let mut store = StateStore::local(config.snapshot_path.clone());
    if let Some(url) = &config.snapshot_url {
        let http = shared_client(config.snapshot_http())?;
        store = store.with_remote(url.as_str(), http);
    }

    let renderer = ReportRenderer::new(config.template_path.as_deref())?;

    Ok(DashboardServices {
        fingerprints: Arc::new(fingerprints),
        runner: project_runner(config),
        tracker: Arc::new(tracker),
        store,
        renderer,
    })
}
