use phrasebook_core::model::{KnownSet, Manifest, Pack, PackUrl};
use phrasebook_core::{ProgressWrite, StudySession};

use crate::error::PackError;
use crate::pack_client::PackClient;
use crate::progress_store::{ProgressStore, QueuedWrite};

/// Manifest plus the pack that should be pre-selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub manifest: Manifest,
    pub selected: Option<PackUrl>,
}

/// Everything needed to (re)start a session on one pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPack {
    pub url: PackUrl,
    pub pack: Pack,
    pub known: KnownSet,
}

impl LoadedPack {
    /// Replace the session contents with this pack.
    pub fn apply_to(self, session: &mut StudySession) {
        session.load(self.url, self.pack, self.known);
    }
}

/// Orchestrates the pack client and the progress store for the study view.
#[derive(Clone)]
pub struct StudyService {
    packs: PackClient,
    progress: ProgressStore,
}

impl StudyService {
    #[must_use]
    pub fn new(packs: PackClient, progress: ProgressStore) -> Self {
        Self { packs, progress }
    }

    #[must_use]
    pub fn packs(&self) -> &PackClient {
        &self.packs
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Fetch the manifest and pick the pack to pre-select.
    ///
    /// The last selected pack wins when it is still listed; otherwise the
    /// first pack of the manifest is selected.
    ///
    /// # Errors
    ///
    /// Returns `PackError` when the manifest cannot be fetched or decoded.
    pub async fn open_catalog(&self) -> Result<Catalog, PackError> {
        let manifest = self.packs.fetch_manifest().await?;
        let remembered = self
            .progress
            .last_selected_pack()
            .await
            .filter(|url| manifest.find(url).is_some());
        let selected = remembered.or_else(|| manifest.first().map(|pack| pack.url.clone()));
        Ok(Catalog { manifest, selected })
    }

    /// Remember `url` as the selected pack, read its progress and fetch it.
    ///
    /// # Errors
    ///
    /// Returns `PackError` when the pack cannot be fetched or decoded. The
    /// selection is remembered even then, so a reload retries the same pack.
    pub async fn load_pack(&self, url: &PackUrl) -> Result<LoadedPack, PackError> {
        self.progress.set_last_selected_pack(url).await;
        let known = self.progress.load_known(url).await;
        let pack = self.packs.fetch_pack(url).await?;
        Ok(LoadedPack {
            url: url.clone(),
            pack,
            known,
        })
    }

    /// Persist a known-set change produced by the session.
    pub async fn persist(&self, write: &ProgressWrite) {
        self.progress.apply(write).await;
    }

    /// Stamp a known-set change in the order the session produced it.
    #[must_use]
    pub fn queue(&self, write: ProgressWrite) -> QueuedWrite {
        self.progress.enqueue(write)
    }

    /// Persist a stamped change; a change older than one already stored for
    /// the same pack is dropped.
    pub async fn commit(&self, queued: QueuedWrite) {
        self.progress.commit(queued).await;
    }
}
