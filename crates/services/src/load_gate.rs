use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token handed out when a pack load starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Decides which in-flight pack load may update the session.
///
/// Only the most recently issued ticket is current, so a slow response for an
/// earlier selection cannot overwrite a newer one.
#[derive(Clone, Debug, Default)]
pub struct LoadGate {
    latest: Arc<AtomicU64>,
}

impl LoadGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding every earlier ticket.
    #[must_use]
    pub fn issue(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
