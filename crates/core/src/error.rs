use thiserror::Error;

/// A decoded resource does not have the shape the study tool needs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("expected `{field}` to be an array")]
    MissingArray { field: &'static str },

    #[error("unexpected shape: {0}")]
    InvalidShape(String),
}

impl FormatError {
    pub(crate) fn json(err: &serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }

    pub(crate) fn shape(err: &serde_json::Error) -> Self {
        Self::InvalidShape(err.to_string())
    }
}
