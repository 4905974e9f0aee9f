//! Version control queries for font sources
//!
//! Answers one question per source file: which commit last touched it. The
//! answer is rendered as a short reference string
//! (`<abbrev> (<subject>, <YYYY-MM-DD>)`) that the dashboard stores as the
//! source's fingerprint.

pub mod commit;
pub mod error;
pub mod git;

pub use commit::CommitReference;
pub use error::{Result, VcsError};
pub use git::GitRepository;
