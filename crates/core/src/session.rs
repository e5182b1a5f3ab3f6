use rand::Rng;

use crate::model::{Entry, EntryId, KnownSet, Pack, PackUrl};
use crate::order::TraversalOrder;

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

/// Where the learner stands in the load / reveal cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyPhase {
    Unloaded,
    Hidden,
    Revealed,
}

/// Known-set snapshot that has to be persisted after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressWrite {
    pub pack_url: PackUrl,
    pub known: KnownSet,
}

/// Counters for the position label and the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// 1-based position in the traversal order, 0 when nothing is loaded.
    pub position: usize,
    pub total: usize,
    pub known_count: usize,
    /// Rounded percentage of entries in the known set.
    pub known_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActivePack {
    url: PackUrl,
    pack: Pack,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory study state for one loaded pack.
///
/// Owns the traversal order, pointer, reveal flag and a cached copy of the
/// pack's known set. Every mutation is synchronous; operations that change the
/// known set hand back a [`ProgressWrite`] for the caller to persist.
#[derive(Debug, Clone, Default)]
pub struct StudySession {
    active: Option<ActivePack>,
    order: TraversalOrder,
    pointer: usize,
    revealed: bool,
    shuffled: bool,
    known: KnownSet,
}

impl StudySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with a freshly fetched pack.
    ///
    /// The traversal order honours the current shuffle mode.
    pub fn load(&mut self, url: PackUrl, pack: Pack, known: KnownSet) {
        self.load_with(url, pack, known, &mut rand::rng());
    }

    pub fn load_with<R: Rng + ?Sized>(
        &mut self,
        url: PackUrl,
        pack: Pack,
        known: KnownSet,
        rng: &mut R,
    ) {
        self.active = Some(ActivePack { url, pack });
        self.known = known;
        self.rebuild_order(rng);
        self.pointer = 0;
        self.revealed = false;
    }

    /// Switch between sequential and shuffled traversal.
    pub fn set_shuffled(&mut self, shuffled: bool) {
        self.set_shuffled_with(shuffled, &mut rand::rng());
    }

    pub fn set_shuffled_with<R: Rng + ?Sized>(&mut self, shuffled: bool, rng: &mut R) {
        self.shuffled = shuffled;
        self.rebuild_order(rng);
        self.pointer = 0;
        self.revealed = false;
    }

    pub fn next(&mut self) {
        let len = self.order.len();
        if len == 0 {
            return;
        }
        self.pointer = (self.pointer + 1) % len;
        self.revealed = false;
    }

    pub fn prev(&mut self) {
        let len = self.order.len();
        if len == 0 {
            return;
        }
        self.pointer = (self.pointer + len - 1) % len;
        self.revealed = false;
    }

    pub fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Move to the entry with `id` and show its answer.
    ///
    /// Returns false when the loaded pack has no such entry.
    pub fn jump_to_entry(&mut self, id: &EntryId) -> bool {
        self.jump_to_entry_with(id, &mut rand::rng())
    }

    pub fn jump_to_entry_with<R: Rng + ?Sized>(&mut self, id: &EntryId, rng: &mut R) -> bool {
        let Some(index) = self.pack().and_then(|pack| pack.index_of(id)) else {
            return false;
        };

        let position = match self.order.position_of(index) {
            Some(position) => position,
            None => {
                self.rebuild_order(rng);
                match self.order.position_of(index) {
                    Some(position) => position,
                    None => return false,
                }
            }
        };

        self.pointer = position;
        self.revealed = true;
        true
    }

    /// Add the current entry to the known set and advance.
    ///
    /// Marking an entry that is already known leaves the set unchanged but
    /// still advances.
    pub fn mark_current_known(&mut self) -> Option<ProgressWrite> {
        let id = self.current_entry()?.id().clone();
        self.known.insert(id);
        let write = self.progress_write();
        self.next();
        write
    }

    /// Forget every known entry of the loaded pack.
    pub fn reset_known(&mut self) -> Option<ProgressWrite> {
        self.active.as_ref()?;
        self.known.clear();
        self.progress_write()
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&Entry> {
        let index = self.order.get(self.pointer)?;
        self.pack()?.items().get(index)
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        let entries = self.entries();
        let total = entries.len();
        let known_count = self.known.count_in(entries);
        let position = if total == 0 { 0 } else { self.pointer + 1 };
        let known_percent = if total == 0 {
            0
        } else {
            // Round half up, matching a browser's Math.round for positives.
            u32::try_from((known_count * 100 + total / 2) / total).unwrap_or(100)
        };

        Progress {
            position,
            total,
            known_count,
            known_percent,
        }
    }

    #[must_use]
    pub fn phase(&self) -> StudyPhase {
        match (&self.active, self.revealed) {
            (None, _) => StudyPhase::Unloaded,
            (Some(_), false) => StudyPhase::Hidden,
            (Some(_), true) => StudyPhase::Revealed,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    #[must_use]
    pub fn is_known(&self, id: &EntryId) -> bool {
        self.known.contains(id)
    }

    #[must_use]
    pub fn known(&self) -> &KnownSet {
        &self.known
    }

    #[must_use]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    #[must_use]
    pub fn order(&self) -> &TraversalOrder {
        &self.order
    }

    #[must_use]
    pub fn pack(&self) -> Option<&Pack> {
        self.active.as_ref().map(|active| &active.pack)
    }

    #[must_use]
    pub fn pack_url(&self) -> Option<&PackUrl> {
        self.active.as_ref().map(|active| &active.url)
    }

    /// Entries of the loaded pack in their original order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        self.pack().map(Pack::items).unwrap_or(&[])
    }

    fn rebuild_order<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.entries().len();
        self.order = if self.shuffled {
            TraversalOrder::shuffled(len, rng)
        } else {
            TraversalOrder::identity(len)
        };
    }

    fn progress_write(&self) -> Option<ProgressWrite> {
        let url = self.pack_url()?;
        Some(ProgressWrite {
            pack_url: url.clone(),
            known: self.known.clone(),
        })
    }
}
