use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::EntryId;

/// Word-level sub-translation shown as a chip once an entry is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub no: String,
    #[serde(default)]
    pub en: String,
}

impl Token {
    #[must_use]
    pub fn new(no: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            no: no.into(),
            en: en.into(),
        }
    }
}

/// One phrase unit of a pack.
///
/// `no` is the source phrase, `en` its translation. Pronunciation and the
/// token breakdown are optional in the pack JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(deserialize_with = "id_from_scalar")]
    id: EntryId,
    #[serde(default)]
    no: String,
    #[serde(default)]
    en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pron: Option<String>,
    #[serde(
        default,
        deserialize_with = "tokens_or_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    tokens: Vec<Token>,
}

impl Entry {
    #[must_use]
    pub fn new(id: impl Into<EntryId>, no: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            no: no.into(),
            en: en.into(),
            pron: None,
            tokens: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pron(mut self, pron: impl Into<String>) -> Self {
        self.pron = Some(pron.into());
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = tokens;
        self
    }

    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    #[must_use]
    pub fn no(&self) -> &str {
        &self.no
    }

    #[must_use]
    pub fn en(&self) -> &str {
        &self.en
    }

    #[must_use]
    pub fn pron(&self) -> Option<&str> {
        self.pron.as_deref()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

// Packs are hand-authored; a `tokens` value that is not an array of tokens is
// ignored rather than rejecting the whole pack.
fn tokens_or_empty<'de, D>(deserializer: D) -> Result<Vec<Token>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// Hand-numbered packs sometimes write `"id": 7`.
fn id_from_scalar<'de, D>(deserializer: D) -> Result<EntryId, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(EntryId::new(id)),
        serde_json::Value::Number(id) => Ok(EntryId::new(id.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "entry id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_entry() {
        let entry: Entry = serde_json::from_str(
            r#"{
                "id": "a1-0001",
                "no": "Hei, jeg heter Devon.",
                "en": "Hi, my name is Devon.",
                "pron": "hay, yay HEH-ter DEH-von",
                "tokens": [{"no": "Hei", "en": "Hi"}, {"no": "jeg", "en": "I"}]
            }"#,
        )
        .unwrap();

        assert_eq!(entry.id().as_str(), "a1-0001");
        assert_eq!(entry.pron(), Some("hay, yay HEH-ter DEH-von"));
        assert_eq!(entry.tokens().len(), 2);
        assert_eq!(entry.tokens()[1], Token::new("jeg", "I"));
    }

    #[test]
    fn numeric_id_is_read_as_text() {
        let entry: Entry = serde_json::from_str(r#"{"id": 7, "no": "Ja"}"#).unwrap();
        assert_eq!(entry.id().as_str(), "7");
    }

    #[test]
    fn missing_or_null_id_is_rejected() {
        assert!(serde_json::from_str::<Entry>(r#"{"no": "Ja"}"#).is_err());
        assert!(serde_json::from_str::<Entry>(r#"{"id": null, "no": "Ja"}"#).is_err());
    }

    #[test]
    fn optional_fields_default() {
        let entry: Entry = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(entry.no(), "");
        assert_eq!(entry.en(), "");
        assert!(entry.pron().is_none());
        assert!(entry.tokens().is_empty());
    }

    #[test]
    fn non_array_tokens_are_ignored() {
        let entry: Entry =
            serde_json::from_str(r#"{"id": "x", "no": "Takk", "tokens": "Takk=Thanks"}"#).unwrap();
        assert!(entry.tokens().is_empty());
    }

    #[test]
    fn missing_id_is_rejected() {
        let result = serde_json::from_str::<Entry>(r#"{"no": "Hei", "en": "Hi"}"#);
        assert!(result.is_err());
    }
}
