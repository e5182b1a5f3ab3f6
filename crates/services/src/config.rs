use std::env;

use phrasebook_core::model::PackUrl;
use url::Url;

use crate::error::{ConfigError, FetchError};

pub const DEFAULT_MANIFEST: &str = "packs/manifest.json";

/// Where packs are served from.
///
/// Packs hosted next to the app keep the default relative manifest; packs
/// hosted elsewhere use an absolute manifest URL such as
/// `https://raw.githubusercontent.com/<user>/<repo>/<branch>/packs/manifest.json`.
/// Relative pack URLs in the manifest resolve against `base_url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    manifest: PackUrl,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyManifest` for a blank manifest location.
    pub fn new(base_url: Url, manifest: PackUrl) -> Result<Self, ConfigError> {
        if manifest.is_blank() {
            return Err(ConfigError::EmptyManifest);
        }
        Ok(Self { base_url, manifest })
    }

    /// Read `PHRASEBOOK_BASE_URL` and `PHRASEBOOK_MANIFEST_URL`.
    ///
    /// Without a base URL the current directory is used, so the default
    /// manifest is `./packs/manifest.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the base URL does not parse or the working
    /// directory is unavailable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = match env::var("PHRASEBOOK_BASE_URL") {
            Ok(raw) if !raw.trim().is_empty() => parse_base_url(&raw)?,
            _ => default_base_url()?,
        };
        let manifest = env::var("PHRASEBOOK_MANIFEST_URL")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| PackUrl::new(DEFAULT_MANIFEST), PackUrl::new);
        Self::new(base_url, manifest)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError::EmptyManifest` for a blank manifest location.
    pub fn with_manifest(mut self, manifest: PackUrl) -> Result<Self, ConfigError> {
        if manifest.is_blank() {
            return Err(ConfigError::EmptyManifest);
        }
        self.manifest = manifest;
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn manifest(&self) -> &PackUrl {
        &self.manifest
    }

    /// Absolute location of the manifest.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the location does not resolve.
    pub fn manifest_location(&self) -> Result<Url, FetchError> {
        self.resolve(&self.manifest)
    }

    /// Absolute location of a pack listed in the manifest.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the location does not resolve.
    pub fn resolve(&self, url: &PackUrl) -> Result<Url, FetchError> {
        url.resolve(&self.base_url)
            .map_err(|err| FetchError::InvalidUrl {
                raw: url.to_string(),
                reason: err.to_string(),
            })
    }
}

/// Parse a base URL, accepting plain directory paths as well.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` when the value is neither a URL nor
/// an absolute path.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if let Ok(url) = Url::parse(trimmed) {
        return Ok(with_trailing_slash(url));
    }

    let path = std::path::Path::new(trimmed);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|_| ConfigError::NoWorkingDirectory)?
            .join(path)
    };
    Url::from_directory_path(&absolute).map_err(|()| ConfigError::InvalidBaseUrl {
        raw: raw.to_string(),
        reason: "not a url or directory path".to_string(),
    })
}

/// The current working directory as a `file://` URL.
///
/// # Errors
///
/// Returns `ConfigError::NoWorkingDirectory` if it cannot be determined.
pub fn default_base_url() -> Result<Url, ConfigError> {
    let cwd = env::current_dir().map_err(|_| ConfigError::NoWorkingDirectory)?;
    Url::from_directory_path(cwd).map_err(|()| ConfigError::NoWorkingDirectory)
}

// `Url::join` drops the last path segment unless the base ends with '/'.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.cannot_be_a_base() && !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
