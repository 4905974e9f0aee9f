//! Incremental dashboard runs
//!
//! A run loads the previous state, decides which font projects changed since
//! their last recorded build, rebuilds at most `max_build` of them, attaches
//! open tracker issues to every known family and publishes the merged state
//! together with a rendered report.
//!
//! - [`ChangeDetector`]: compares a source's current fingerprint with the stored one
//! - [`ProjectScanner`] and [`BuildSelector`]: discovery and the capped build queue
//! - [`IssueCorrelator`]: label-derived script keys matched against family names
//! - [`Dashboard`]: sequences a whole run

pub mod change;
pub mod discovery;
pub mod error;
pub mod fingerprint;
pub mod issues;
pub mod orchestrator;
pub mod selector;
pub mod wiring;

pub use change::{ChangeCheck, ChangeDetector};
pub use discovery::{Collision, Discovery, ProjectScanner};
pub use error::{DashboardError, Result};
pub use fingerprint::{FingerprintSource, GitFingerprints};
pub use issues::{IssueCorrelator, IssueIndex};
pub use orchestrator::{Dashboard, DashboardServices, RunPlan, RunSummary};
pub use selector::{BuildSelector, Selection};
pub use wiring::{font_project_builder, production_services, project_runner};
