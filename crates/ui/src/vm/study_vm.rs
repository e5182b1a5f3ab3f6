use phrasebook_core::StudySession;
use phrasebook_core::model::{Entry, EntryId};

pub const MASKED_TRANSLATION: &str = "••••";
pub const PACK_LOAD_FAILED: &str = "Failed to load pack";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudyIntent {
    Next,
    Prev,
    ToggleReveal,
    MarkKnown,
    ResetKnown,
    SetShuffled(bool),
    JumpTo(EntryId),
}

/// What the flashcard shows for the current entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardVm {
    pub source: String,
    pub translation: String,
    pub pron: String,
    pub chips: Vec<String>,
    pub revealed: bool,
    pub known: bool,
}

impl CardVm {
    #[must_use]
    pub fn from_entry(entry: &Entry, revealed: bool, known: bool) -> Self {
        let translation = if revealed {
            entry.en().to_string()
        } else {
            MASKED_TRANSLATION.to_string()
        };
        let pron = if revealed {
            entry.pron().unwrap_or_default().to_string()
        } else {
            String::new()
        };
        let chips = if revealed {
            entry
                .tokens()
                .iter()
                .map(|token| format!("{} = {}", token.no, token.en))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            source: entry.no().to_string(),
            translation,
            pron,
            chips,
            revealed,
            known,
        }
    }

    /// Card shown when the pack could not be fetched or decoded.
    #[must_use]
    pub fn load_failed() -> Self {
        Self {
            source: PACK_LOAD_FAILED.to_string(),
            translation: String::new(),
            pron: String::new(),
            chips: Vec::new(),
            revealed: false,
            known: false,
        }
    }
}

/// One row of the searchable entry list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryListItemVm {
    pub id: EntryId,
    pub no: String,
    pub en: String,
    /// The row's visible text, `Go` button label included.
    pub search_text: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyVm {
    pub title: String,
    pub card: Option<CardVm>,
    pub position_label: String,
    pub progress_width: String,
    pub known_label: String,
    pub shuffled: bool,
    pub entries: Vec<EntryListItemVm>,
}

impl StudyVm {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            card: None,
            position_label: "0 / 0".to_string(),
            progress_width: "0%".to_string(),
            known_label: String::new(),
            shuffled: false,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn load_failed(shuffled: bool) -> Self {
        Self {
            card: Some(CardVm::load_failed()),
            shuffled,
            ..Self::empty()
        }
    }
}

#[must_use]
pub fn map_study(session: &StudySession) -> StudyVm {
    let Some(pack) = session.pack() else {
        return StudyVm {
            shuffled: session.is_shuffled(),
            ..StudyVm::empty()
        };
    };

    let current = session.current_entry();
    let card = current.map(|entry| {
        CardVm::from_entry(entry, session.is_revealed(), session.is_known(entry.id()))
    });
    let current_id = current.map(Entry::id);
    let progress = session.progress();

    StudyVm {
        title: pack.name().to_string(),
        card,
        position_label: format!("{} / {}", progress.position, progress.total),
        progress_width: format!("{}%", progress.known_percent),
        known_label: format!("{} known", progress.known_count),
        shuffled: session.is_shuffled(),
        entries: map_entry_list(pack.items(), current_id),
    }
}

#[must_use]
pub fn map_entry_list(items: &[Entry], current: Option<&EntryId>) -> Vec<EntryListItemVm> {
    items
        .iter()
        .map(|entry| EntryListItemVm {
            id: entry.id().clone(),
            no: entry.no().to_string(),
            en: entry.en().to_string(),
            search_text: format!("{}{}Go", entry.no(), entry.en()),
            active: current == Some(entry.id()),
        })
        .collect()
}

/// Rows whose text contains `query`, ignoring case and surrounding whitespace.
#[must_use]
pub fn filter_entries<'a>(list: &'a [EntryListItemVm], query: &str) -> Vec<&'a EntryListItemVm> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return list.iter().collect();
    }
    list.iter()
        .filter(|item| item.search_text.to_lowercase().contains(&needle))
        .collect()
}
