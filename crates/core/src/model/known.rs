use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::model::entry::Entry;
use crate::model::ids::EntryId;

/// Entry ids a learner has marked as mastered, scoped to one pack.
///
/// Keeps insertion order so the persisted JSON array is stable between saves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownSet(IndexSet<EntryId>);

impl KnownSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a persisted JSON array of entry ids.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` when the payload is not a JSON array of strings.
    pub fn from_json(raw: &str) -> Result<Self, FormatError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| FormatError::json(&e))?;
        serde_json::from_value(value).map_err(|e| FormatError::shape(&e))
    }

    /// Encode as a JSON array of entry ids.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A sequence of plain strings always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// Returns true if the id was not already present.
    pub fn insert(&mut self, id: EntryId) -> bool {
        self.0.insert(id)
    }

    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.0.contains(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryId> {
        self.0.iter()
    }

    /// Number of `entries` whose id is in the set.
    ///
    /// Ids left over from an older revision of the pack are not counted.
    #[must_use]
    pub fn count_in(&self, entries: &[Entry]) -> usize {
        entries
            .iter()
            .filter(|entry| self.contains(entry.id()))
            .count()
    }
}

impl FromIterator<EntryId> for KnownSet {
    fn from_iter<I: IntoIterator<Item = EntryId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
