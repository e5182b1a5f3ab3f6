//! Shared error types for the services crate.

use thiserror::Error;

use phrasebook_core::FormatError;
use storage::sqlite::SqliteInitError;

/// A pack resource could not be retrieved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("invalid url {raw}: {reason}")]
    InvalidUrl { raw: String, reason: String },
    #[error("unsupported url scheme `{scheme}`")]
    UnsupportedScheme { scheme: String },
    #[error("request for {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by `PackClient` and `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl PackError {
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Invalid client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base url {raw}: {reason}")]
    InvalidBaseUrl { raw: String, reason: String },
    #[error("manifest location cannot be empty")]
    EmptyManifest,
    #[error("could not determine the working directory")]
    NoWorkingDirectory,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
