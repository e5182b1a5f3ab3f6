use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormatError;
use crate::model::entry::Entry;
use crate::model::ids::{EntryId, PackUrl};

/// Manifest line pointing at a pack resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRef {
    pub url: PackUrl,
    #[serde(default)]
    pub name: String,
}

impl PackRef {
    #[must_use]
    pub fn new(url: impl Into<PackUrl>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// List of available packs, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    packs: Vec<PackRef>,
    #[serde(skip)]
    skipped: usize,
}

impl Manifest {
    #[must_use]
    pub fn new(packs: Vec<PackRef>) -> Self {
        Self { packs, skipped: 0 }
    }

    /// Decode a manifest body.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::MissingArray` when `packs` is absent or not an
    /// array and `FormatError::InvalidJson` when the body is not JSON.
    /// Elements without a `url` are skipped and counted in
    /// [`Manifest::skipped`]; a missing `name` falls back to the url.
    pub fn from_json(body: &str) -> Result<Self, FormatError> {
        let mut value: Value = serde_json::from_str(body).map_err(|e| FormatError::json(&e))?;
        let elements = take_array(&mut value, "packs")?;
        let mut manifest: Self =
            serde_json::from_value(value).map_err(|e| FormatError::shape(&e))?;
        let (mut packs, skipped) = decode_elements::<PackRef>(elements);
        for pack in &mut packs {
            if pack.name.trim().is_empty() {
                pack.name = pack.url.to_string();
            }
        }
        manifest.packs = packs;
        manifest.skipped = skipped;
        Ok(manifest)
    }

    /// Number of manifest elements dropped while decoding.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn packs(&self) -> &[PackRef] {
        &self.packs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    #[must_use]
    pub fn find(&self, url: &PackUrl) -> Option<&PackRef> {
        self.packs.iter().find(|pack| &pack.url == url)
    }

    #[must_use]
    pub fn first(&self) -> Option<&PackRef> {
        self.packs.first()
    }
}

/// A named collection of study entries for one language/level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pack {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    items: Vec<Entry>,
    #[serde(skip)]
    skipped: usize,
}

impl Pack {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        language: impl Into<String>,
        items: Vec<Entry>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
            items,
            skipped: 0,
        }
    }

    /// Decode a pack body.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::MissingArray` when `items` is absent or not an
    /// array and `FormatError::InvalidJson` when the body is not JSON.
    /// Entries without a usable `id` are skipped and counted in
    /// [`Pack::skipped`].
    pub fn from_json(body: &str) -> Result<Self, FormatError> {
        let mut value: Value = serde_json::from_str(body).map_err(|e| FormatError::json(&e))?;
        let elements = take_array(&mut value, "items")?;
        let mut pack: Self = serde_json::from_value(value).map_err(|e| FormatError::shape(&e))?;
        let (items, skipped) = decode_elements::<Entry>(elements);
        pack.items = items;
        pack.skipped = skipped;
        Ok(pack)
    }

    /// Number of pack entries dropped while decoding.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the entry with the given id, in pack order.
    #[must_use]
    pub fn index_of(&self, id: &EntryId) -> Option<usize> {
        self.items.iter().position(|entry| entry.id() == id)
    }
}

fn take_array(value: &mut Value, field: &'static str) -> Result<Vec<Value>, FormatError> {
    match value.get_mut(field) {
        Some(Value::Array(elements)) => Ok(std::mem::take(elements)),
        _ => Err(FormatError::MissingArray { field }),
    }
}

// Hand-authored files: one bad element must not hide the rest.
fn decode_elements<T: DeserializeOwned>(elements: Vec<Value>) -> (Vec<T>, usize) {
    let total = elements.len();
    let decoded: Vec<T> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect();
    let skipped = total - decoded.len();
    (decoded, skipped)
}
