//! `notodash` command line
//!
//! - `notodash run`: one incremental dashboard run (`--dry-run` only plans it)
//! - `notodash build`: build a single project from its sources

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;
