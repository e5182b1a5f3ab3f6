use std::sync::Arc;

use phrasebook_core::model::{Manifest, Pack, PackUrl};
use storage::repository::KeyValueStore;

use crate::config::ClientConfig;
use crate::error::PackError;
use crate::transport::{HttpTransport, PackTransport};

/// Session-store key holding the last good manifest body.
pub const MANIFEST_CACHE_KEY: &str = "manifest-cache";

/// Reads the manifest and individual packs.
#[derive(Clone)]
pub struct PackClient {
    config: ClientConfig,
    transport: Arc<dyn PackTransport>,
    session: Arc<dyn KeyValueStore>,
}

impl PackClient {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn PackTransport>,
        session: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
        }
    }

    #[must_use]
    pub fn http(config: ClientConfig, session: Arc<dyn KeyValueStore>) -> Self {
        Self::new(config, Arc::new(HttpTransport::new()), session)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the list of packs.
    ///
    /// A manifest fetched earlier in this session is served from the session
    /// store without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Fetch` when the request fails and
    /// `PackError::Format` when the body has no `packs` array.
    pub async fn fetch_manifest(&self) -> Result<Manifest, PackError> {
        if let Some(manifest) = self.cached_manifest().await {
            tracing::debug!("manifest served from session cache");
            return Ok(manifest);
        }

        let url = self.config.manifest_location()?;
        tracing::debug!(%url, "fetching manifest");
        let body = self.transport.get_text(&url).await?;
        let manifest = Manifest::from_json(&body)?;
        if manifest.skipped() > 0 {
            tracing::warn!(skipped = manifest.skipped(), "manifest lists packs without a url");
        }

        if let Err(err) = self.session.set(MANIFEST_CACHE_KEY, &body).await {
            tracing::warn!(error = %err, "could not cache manifest");
        }
        tracing::info!(packs = manifest.packs().len(), "manifest loaded");
        Ok(manifest)
    }

    /// Fetch a pack. Never cached, so edits to a pack show up on reload.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Fetch` when the request fails and
    /// `PackError::Format` when the body has no `items` array.
    pub async fn fetch_pack(&self, url: &PackUrl) -> Result<Pack, PackError> {
        let location = self.config.resolve(url)?;
        tracing::debug!(%location, "fetching pack");
        let body = self.transport.get_text(&location).await?;
        let pack = Pack::from_json(&body)?;
        if pack.skipped() > 0 {
            tracing::warn!(pack = %url, skipped = pack.skipped(), "skipped entries without an id");
        }
        tracing::info!(pack = %url, items = pack.len(), "pack loaded");
        Ok(pack)
    }

    async fn cached_manifest(&self) -> Option<Manifest> {
        let body = match self.session.get(MANIFEST_CACHE_KEY).await {
            Ok(body) => body?,
            Err(err) => {
                tracing::warn!(error = %err, "session cache unavailable");
                return None;
            }
        };
        match Manifest::from_json(&body) {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed cached manifest");
                None
            }
        }
    }
}
