//! Change detection

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::fingerprint::FingerprintSource;

/// Current fingerprint and whether it calls for a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCheck {
    pub fingerprint: String,
    pub needs_build: bool,
}

/// Compares fresh fingerprints with the recorded ones
#[derive(Clone)]
pub struct ChangeDetector {
    source: Arc<dyn FingerprintSource>,
}

impl ChangeDetector {
    pub fn new(source: Arc<dyn FingerprintSource>) -> Self {
        Self { source }
    }

    /// Check `primary_source` against the fingerprint stored for its family
    ///
    /// A family without an entry, or without a stored fingerprint, always
    /// needs a build. Lookup failures are returned, never read as "unchanged".
    pub fn check(&self, primary_source: &Path, recorded: Option<&str>) -> Result<ChangeCheck> {
        let fingerprint = self.source.fingerprint(primary_source)?;
        let needs_build = recorded != Some(fingerprint.as_str());
        Ok(ChangeCheck {
            fingerprint,
            needs_build,
        })
    }
}
