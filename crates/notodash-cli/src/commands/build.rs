// notodash build

use std::path::PathBuf;

use notodash_builder::BuildOptions;
use notodash_core::family_name;
use notodash_dashboard::font_project_builder;
use tracing::{info, warn};

use super::load_config;
use crate::error::{CliError, CliResult};
use crate::output::format_produced;

/// Builds a single project and lists what it produced
pub struct BuildCommand {
    config_path: Option<PathBuf>,
    sources: Vec<PathBuf>,
    variable: bool,
    otf: bool,
}

impl BuildCommand {
    pub fn new(config_path: Option<PathBuf>, sources: Vec<PathBuf>) -> Self {
        Self {
            config_path,
            sources,
            variable: true,
            otf: true,
        }
    }

    pub fn with_variable(mut self, enabled: bool) -> Self {
        self.variable = enabled;
        self
    }

    pub fn with_otf(mut self, enabled: bool) -> Self {
        self.otf = enabled;
        self
    }

    /// Options for this build below `output_root`
    pub fn options(&self, output_root: &std::path::Path) -> CliResult<BuildOptions> {
        let primary = self.sources.first().ok_or_else(|| CliError::InvalidArgument {
            message: "at least one source file is required".to_string(),
        })?;
        let family = family_name(primary).map_err(|e| CliError::InvalidArgument {
            message: e.to_string(),
        })?;

        Ok(BuildOptions::for_family(&family, self.sources.clone(), output_root)
            .with_variable(self.variable)
            .with_otf(self.otf))
    }

    pub async fn execute(&self) -> CliResult<()> {
        let config = load_config(self.config_path.as_deref(), None)?;
        let options = self.options(&config.output_root)?;
        info!(family = %options.family_name, sources = self.sources.len(), "Building project");

        tokio::fs::create_dir_all(&options.family_dir).await?;
        let outcome = font_project_builder(&config).build(&options).await;
        if let Err(e) = outcome.log.write_to(&options.log_path()).await {
            warn!(family = %options.family_name, error = %e, "Couldn't write build log");
        }

        if let Some(message) = outcome.error {
            return Err(CliError::Build {
                family: options.family_name,
                message,
            });
        }

        print!("{}", format_produced(outcome.outputs.iter().map(PathBuf::as_path)));
        Ok(())
    }
}
