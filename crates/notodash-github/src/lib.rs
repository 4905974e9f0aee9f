//! Issue tracker access
//!
//! Lists the open issues of a GitHub repository (every page) so the
//! dashboard can attach them to font families by their script labels.

pub mod config;
pub mod errors;
pub mod issues;

pub use config::GitHubConfig;
pub use errors::{GitHubError, Result};
pub use issues::{GitHubIssueTracker, IssueTracker, TrackerIssue};
