//! Dashboard storage
//!
//! - [`DashboardConfig`]: run configuration from YAML/TOML/JSON files and
//!   `NOTODASH_*` environment variables
//! - [`StateStore`]: best-effort snapshot loading (published URL or local
//!   file) and atomic snapshot writes
//! - [`ReportRenderer`]: the HTML dashboard, rendered with handlebars

pub mod config;
pub mod error;
pub mod report;
pub mod state_store;

pub use config::{ConfigFormat, ConfigLoader, DashboardConfig, EnvOverrides};
pub use error::{IoOperation, StorageError, StorageResult};
pub use report::{commit_link, ProjectReport, ReportData, ReportEntry, ReportRenderer};
pub use state_store::StateStore;
