//! Commit references

use serde::{Deserialize, Serialize};

/// The commit that last changed a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReference {
    /// Full commit hash
    pub id: String,
    /// Abbreviated, unambiguous hash
    pub short_id: String,
    /// First line of the commit message
    pub summary: String,
    /// Author date as `YYYY-MM-DD`
    pub date: String,
}

impl CommitReference {
    /// Render as `<abbrev> (<subject>, <YYYY-MM-DD>)`
    pub fn reference(&self) -> String {
        format!("{} ({}, {})", self.short_id, self.summary, self.date)
    }
}

impl std::fmt::Display for CommitReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reference())
    }
}
