// Command handlers

pub mod build;
pub mod run;

pub use build::BuildCommand;
pub use run::RunCommand;

use std::path::Path;

use notodash_storage::DashboardConfig;

use crate::error::CliResult;

/// Load, override and validate the configuration
pub(crate) fn load_config(path: Option<&Path>, max_build: Option<usize>) -> CliResult<DashboardConfig> {
    let mut config = DashboardConfig::load(path)?;
    if let Some(max_build) = max_build {
        config.max_build = max_build;
    }
    config.validate()?;
    Ok(config)
}
