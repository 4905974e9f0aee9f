//! Persisted cross-run state

use std::collections::{BTreeMap, BTreeSet};

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::model::BuildResult;

/// Most recent build result per family, durable across runs
///
/// Rebuilt families are replaced wholesale. Every other entry is written back
/// exactly as it was loaded, including entries this version cannot decode and
/// fields it does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    projects: BTreeMap<String, BuildResult>,
    verbatim: BTreeMap<String, Value>,
}

/// One stored entry, either a result from this process or a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredEntry<'a> {
    /// Result held in decoded form
    Decoded(&'a BuildResult),
    /// Entry kept exactly as loaded
    Verbatim(&'a Value),
}

impl<'a> StoredEntry<'a> {
    /// Recorded fingerprint (`commit`), if any
    pub fn fingerprint(&self) -> Option<&'a str> {
        match *self {
            StoredEntry::Decoded(result) => result.fingerprint.as_deref(),
            StoredEntry::Verbatim(value) => value.get("commit").and_then(Value::as_str),
        }
    }
}

/// Outcome of decoding a snapshot entry by entry
#[derive(Debug, Clone, Default)]
pub struct SnapshotLoad {
    /// Every entry of the snapshot
    pub state: PersistedState,
    /// Families whose entries did not decode; they are kept verbatim and
    /// count as never built
    pub undecoded: Vec<String>,
}

impl PersistedState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded result for a family
    ///
    /// `None` for unknown families and for entries that did not decode.
    pub fn get(&self, family: &str) -> Option<&BuildResult> {
        self.projects.get(family)
    }

    /// Stored entry for a family in the form it will be written back
    pub fn entry(&self, family: &str) -> Option<StoredEntry<'_>> {
        if let Some(value) = self.verbatim.get(family) {
            return Some(StoredEntry::Verbatim(value));
        }
        self.projects.get(family).map(StoredEntry::Decoded)
    }

    /// Whether the family has an entry, decodable or not
    pub fn contains(&self, family: &str) -> bool {
        self.projects.contains_key(family) || self.verbatim.contains_key(family)
    }

    /// Replace the entry for the result's family, returning the previous
    /// decoded result
    pub fn record(&mut self, result: BuildResult) -> Option<BuildResult> {
        self.verbatim.remove(&result.family);
        self.projects.insert(result.family.clone(), result)
    }

    /// Record every result in order
    pub fn merge<I>(&mut self, results: I)
    where
        I: IntoIterator<Item = BuildResult>,
    {
        for result in results {
            self.record(result);
        }
    }

    /// Known family names in sorted order
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.projects
            .keys()
            .chain(self.verbatim.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    /// Every entry by family, in sorted order
    pub fn entries(&self) -> impl Iterator<Item = (&str, StoredEntry<'_>)> {
        self.families()
            .filter_map(move |family| self.entry(family).map(|entry| (family, entry)))
    }

    /// Number of known families
    pub fn len(&self) -> usize {
        self.families().count()
    }

    /// Whether no family is known
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.verbatim.is_empty()
    }

    /// Serialise as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a snapshot entry by entry
    ///
    /// The document itself must be an object with a `projects` object. An
    /// entry that is not a valid build result for its key stays in the state
    /// verbatim; so does a valid one carrying fields a build result lacks.
    pub fn from_json_lenient(content: &str) -> Result<SnapshotLoad> {
        let document: Value = serde_json::from_str(content)?;
        let entries = document
            .get("projects")
            .and_then(Value::as_object)
            .ok_or_else(|| serde_json::Error::custom("snapshot has no `projects` object"))?;

        let mut load = SnapshotLoad::default();
        for (family, entry) in entries {
            match serde_json::from_value::<BuildResult>(entry.clone()) {
                Ok(result) if result.family == *family => {
                    if serde_json::to_value(&result).ok().as_ref() != Some(entry) {
                        load.state.verbatim.insert(family.clone(), entry.clone());
                    }
                    load.state.projects.insert(family.clone(), result);
                }
                Ok(result) => {
                    warn!(
                        family = %family,
                        recorded = %result.family,
                        "Snapshot entry filed under the wrong family, keeping it as is"
                    );
                    load.state.verbatim.insert(family.clone(), entry.clone());
                    load.undecoded.push(family.clone());
                }
                Err(e) => {
                    warn!(family = %family, error = %e, "Undecodable snapshot entry, keeping it as is");
                    load.state.verbatim.insert(family.clone(), entry.clone());
                    load.undecoded.push(family.clone());
                }
            }
        }

        Ok(load)
    }
}

impl Serialize for PersistedState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        struct Projects<'a>(&'a PersistedState);

        impl Serialize for Projects<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(None)?;
                for (family, entry) in self.0.entries() {
                    map.serialize_entry(family, &entry)?;
                }
                map.end()
            }
        }

        let mut document = serializer.serialize_map(Some(1))?;
        document.serialize_entry("projects", &Projects(self))?;
        document.end()
    }
}
