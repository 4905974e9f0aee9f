// notodash run

use std::path::PathBuf;

use notodash_dashboard::{production_services, Dashboard};
use tracing::info;

use super::load_config;
use crate::error::CliResult;
use crate::output::{format_plan, format_summary, OutputStyle};

/// One dashboard run, or its plan with `--dry-run`
pub struct RunCommand {
    config_path: Option<PathBuf>,
    dry_run: bool,
    max_build: Option<usize>,
}

impl RunCommand {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            dry_run: false,
            max_build: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Override the configured per-run cap
    pub fn with_max_build(mut self, max_build: Option<usize>) -> Self {
        self.max_build = max_build;
        self
    }

    pub async fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config_path.as_deref(), self.max_build)?;
        info!(
            source_root = %config.source_root.display(),
            output_root = %config.output_root.display(),
            max_build = config.max_build,
            "Starting dashboard run"
        );

        let services = production_services(&config)?;
        let dashboard = Dashboard::new(config, services);
        let style = OutputStyle::default();

        if self.dry_run {
            let plan = dashboard.plan().await?;
            print!("{}", format_plan(&style, &plan.selection));
            return Ok(());
        }

        let summary = dashboard.run().await?;
        print!("{}", format_summary(&style, &summary));
        Ok(())
    }
}
