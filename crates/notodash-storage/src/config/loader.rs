//! Configuration file loader supporting multiple formats

use std::path::Path;

use super::DashboardConfig;
use crate::error::{IoOperation, StorageError, StorageResult};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Configuration loader for multiple formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, choosing the format by extension
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StorageResult<DashboardConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StorageError::io_error(path.to_path_buf(), IoOperation::Read, e))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                StorageError::parse_error(path.to_path_buf(), "unknown", "File has no extension")
            })?;

        let format = ConfigFormat::from_extension(extension).ok_or_else(|| {
            StorageError::parse_error(
                path.to_path_buf(),
                "unknown",
                format!("Unsupported file format: {}", extension),
            )
        })?;

        Self::load_from_string(&content, format, path)
    }

    /// Load configuration from a string with specified format
    pub fn load_from_string<P: AsRef<Path>>(
        content: &str,
        format: ConfigFormat,
        path: P,
    ) -> StorageResult<DashboardConfig> {
        let path = path.as_ref().to_path_buf();
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| StorageError::parse_error(path, "YAML", e.to_string())),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| StorageError::parse_error(path, "TOML", e.to_string())),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| StorageError::parse_error(path, "JSON", e.to_string())),
        }
    }
}
