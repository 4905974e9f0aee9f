//! Environment variable override support
//!
//! Variables with the `NOTODASH_` prefix override file values; the tracker
//! token comes from `GITHUB_TOKEN`.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::warn;

use super::DashboardConfig;

const PREFIX: &str = "NOTODASH_";

/// Environment variable overrides
pub struct EnvOverrides;

impl EnvOverrides {
    /// Collect `NOTODASH_*` variables keyed by lower-case field name
    pub fn parse() -> HashMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(PREFIX)
                    .map(|field| (field.to_lowercase(), value))
            })
            .collect()
    }

    /// Apply the process environment to a configuration
    pub fn apply(config: &mut DashboardConfig) {
        Self::apply_overrides(config, &Self::parse());
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                config.github_token = Some(token);
            }
        }
    }

    /// Apply specific overrides to a configuration
    pub fn apply_overrides(config: &mut DashboardConfig, overrides: &HashMap<String, String>) {
        for (field, value) in overrides {
            Self::set_config_value(config, field, value);
        }
    }

    fn set_config_value(config: &mut DashboardConfig, field: &str, value: &str) {
        match field {
            "source_root" => config.source_root = PathBuf::from(value),
            "output_root" => config.output_root = PathBuf::from(value),
            "max_build" => match value.parse() {
                Ok(max) => config.max_build = max,
                Err(_) => warn!(value, "Ignoring non-numeric NOTODASH_MAX_BUILD"),
            },
            "denylist" => {
                config.denylist = value
                    .split(',')
                    .map(str::trim)
                    .filter(|family| !family.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "snapshot_url" => {
                config.snapshot_url = Some(value.to_string()).filter(|url| !url.is_empty())
            }
            "snapshot_path" => config.snapshot_path = PathBuf::from(value),
            "report_path" => config.report_path = PathBuf::from(value),
            "template_path" => config.template_path = Some(PathBuf::from(value)),
            "commit_url" => config.commit_url = value.to_string(),
            "issue_repository" => config.issue_repository = value.to_string(),
            "issue_label_prefix" => config.issue_label_prefix = value.to_string(),
            "tool_timeout_secs" => match value.parse() {
                Ok(secs) => config.tool_timeout_secs = secs,
                Err(_) => warn!(value, "Ignoring non-numeric NOTODASH_TOOL_TIMEOUT_SECS"),
            },
            "http_timeout_secs" => match value.parse() {
                Ok(secs) => config.http_timeout_secs = secs,
                Err(_) => warn!(value, "Ignoring non-numeric NOTODASH_HTTP_TIMEOUT_SECS"),
            },
            other => warn!(variable = %format!("{}{}", PREFIX, other.to_uppercase()), "Unknown override"),
        }
    }
}
