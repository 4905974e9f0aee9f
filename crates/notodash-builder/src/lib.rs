//! Font project builds
//!
//! The external toolchain sits behind three traits:
//!
//! - [`FontBuilder`]: compiles sources into fonts, one stage at a time
//!   ([`GftoolsBuilder`] runs `gftools builder`)
//! - [`Hinter`]: autohints one TrueType file ([`TtfautohintHinter`])
//! - [`QaChecker`]: checks a project's fonts and writes an HTML report plus
//!   badge files ([`FontbakeryChecker`])
//!
//! [`FontProjectBuilder`] drives a [`FontBuilder`] for one project and passes
//! every produced artifact through optional [`ArtifactHook`]s (hinting is one).
//! [`ProjectBuildRunner`] adds QA, badge collection and the per-family build
//! log, and turns the whole attempt into a [`notodash_core::BuildResult`].

pub mod error;
pub mod fontbakery;
pub mod gftools;
pub mod hinting;
pub mod log;
pub mod options;
pub mod project;
pub mod runner;

pub use error::{BuildError, Result};
pub use fontbakery::{FontbakeryChecker, QaChecker, QaRequest};
pub use gftools::{BuildStage, FontBuilder, GftoolsBuilder, StageReport};
pub use hinting::{ArtifactHook, Hinter, HintingHook, TtfautohintHinter};
pub use log::BuildLog;
pub use options::BuildOptions;
pub use project::{BuildOutcome, FontProjectBuilder};
pub use runner::ProjectBuildRunner;
