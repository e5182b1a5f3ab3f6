use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Identifier of an entry, unique within its pack (e.g. `a1-0001`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new `EntryId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Location of a pack resource exactly as it appears in the manifest.
///
/// The raw form doubles as the key for per-pack progress, so it is kept
/// verbatim; [`PackUrl::resolve`] turns it into an absolute URL on demand.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackUrl(String);

impl PackUrl {
    /// Creates a new `PackUrl`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the underlying string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the url is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Resolve this (possibly relative) location against `base`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined URL is invalid.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(self.0.trim())
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Debug for PackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackUrl({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PackUrl {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PackUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_display() {
        let id = EntryId::new("a1-0001");
        assert_eq!(id.to_string(), "a1-0001");
        assert_eq!(format!("{id:?}"), "EntryId(a1-0001)");
    }

    #[test]
    fn test_entry_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&EntryId::new("a1-0002")).unwrap();
        assert_eq!(json, "\"a1-0002\"");
    }

    #[test]
    fn test_pack_url_resolves_relative_to_base() {
        let base = Url::parse("https://example.org/study/index.html").unwrap();
        let url = PackUrl::new("packs/a1-core.json");
        assert_eq!(
            url.resolve(&base).unwrap().as_str(),
            "https://example.org/study/packs/a1-core.json"
        );
    }

    #[test]
    fn test_pack_url_keeps_absolute_urls() {
        let base = Url::parse("file:///home/learner/").unwrap();
        let url = PackUrl::new("https://raw.example.org/user/repo/main/packs/a1.json");
        assert_eq!(url.resolve(&base).unwrap().as_str(), url.as_str());
    }

    #[test]
    fn test_pack_url_blank() {
        assert!(PackUrl::new("  ").is_blank());
        assert!(!PackUrl::new("packs/a1.json").is_blank());
    }
}
