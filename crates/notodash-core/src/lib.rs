//! Notodash core data model
//!
//! Shared types for the incremental font build dashboard:
//! - Family name derivation from source filenames
//! - Per-project build results and their categorised outputs
//! - The persisted, cross-run state keyed by family name
//! - Issue records attached to families by the correlator
//!
//! # Examples
//!
//! ```
//! use notodash_core::family_name;
//!
//! assert_eq!(family_name("src/NotoSansFooBar-MM.glyphs").unwrap(), "Noto Sans Foo Bar");
//! ```

pub mod error;
pub mod family;
pub mod model;
pub mod state;

pub use error::{CoreError, Result};
pub use family::{family_name, is_qa_eligible};
pub use model::{categorize_outputs, BuildResult, IssueRecord, OutputCategory, OutputEntry, Project};
pub use state::{PersistedState, SnapshotLoad, StoredEntry};
