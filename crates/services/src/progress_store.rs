use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use phrasebook_core::ProgressWrite;
use phrasebook_core::model::{KnownSet, PackUrl};
use storage::repository::KeyValueStore;
use tokio::sync::Mutex;

pub const LAST_PACK_KEY: &str = "last-pack-url";

/// Storage key of the known set for `pack`.
#[must_use]
pub fn known_key(pack: &PackUrl) -> String {
    format!("known:{pack}")
}

/// Known-set snapshot stamped with its place in the session's write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedWrite {
    seq: u64,
    write: ProgressWrite,
}

impl QueuedWrite {
    #[must_use]
    pub fn write(&self) -> &ProgressWrite {
        &self.write
    }
}

/// Best-effort persistence of study progress.
///
/// Storage failures stop here: reads fall back to empty values and writes are
/// dropped with a warning, so a broken or full store never interrupts study.
///
/// Known-set snapshots go through [`ProgressStore::enqueue`] and
/// [`ProgressStore::commit`]: commits are serialized, and a snapshot older
/// than the last one stored for its pack is dropped, so the newest snapshot
/// wins however the commits are scheduled.
#[derive(Clone)]
pub struct ProgressStore {
    local: Arc<dyn KeyValueStore>,
    next_seq: Arc<AtomicU64>,
    committed: Arc<Mutex<HashMap<PackUrl, u64>>>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(local: Arc<dyn KeyValueStore>) -> Self {
        Self {
            local,
            next_seq: Arc::new(AtomicU64::new(0)),
            committed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn last_selected_pack(&self) -> Option<PackUrl> {
        match self.local.get(LAST_PACK_KEY).await {
            Ok(value) => value.filter(|raw| !raw.is_empty()).map(PackUrl::new),
            Err(err) => {
                tracing::warn!(error = %err, "could not read last selected pack");
                None
            }
        }
    }

    pub async fn set_last_selected_pack(&self, url: &PackUrl) {
        if let Err(err) = self.local.set(LAST_PACK_KEY, url.as_str()).await {
            tracing::warn!(error = %err, pack = %url, "could not remember selected pack");
        }
    }

    pub async fn load_known(&self, pack: &PackUrl) -> KnownSet {
        let raw = match self.local.get(&known_key(pack)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return KnownSet::new(),
            Err(err) => {
                tracing::warn!(error = %err, pack = %pack, "could not read known entries");
                return KnownSet::new();
            }
        };

        KnownSet::from_json(&raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, pack = %pack, "discarding malformed known entries");
            KnownSet::new()
        })
    }

    pub async fn save_known(&self, pack: &PackUrl, known: &KnownSet) {
        if let Err(err) = self.local.set(&known_key(pack), &known.to_json()).await {
            tracing::warn!(error = %err, pack = %pack, "could not save known entries");
        }
    }

    /// Stamp `write` in the order it was produced. Call this synchronously
    /// where the session mutation happens, then hand the result to
    /// [`ProgressStore::commit`].
    #[must_use]
    pub fn enqueue(&self, write: ProgressWrite) -> QueuedWrite {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        QueuedWrite { seq, write }
    }

    /// Store a stamped snapshot unless a newer one for the same pack is
    /// already stored. Returns false when the snapshot was superseded.
    pub async fn commit(&self, queued: QueuedWrite) -> bool {
        let mut committed = self.committed.lock().await;
        let pack = &queued.write.pack_url;
        if committed.get(pack).is_some_and(|&newest| newest > queued.seq) {
            tracing::debug!(pack = %pack, seq = queued.seq, "dropping superseded known entries");
            return false;
        }
        self.save_known(pack, &queued.write.known).await;
        committed.insert(pack.clone(), queued.seq);
        true
    }

    /// Persist the known set produced by a session mutation.
    pub async fn apply(&self, write: &ProgressWrite) {
        let queued = self.enqueue(write.clone());
        self.commit(queued).await;
    }
}
