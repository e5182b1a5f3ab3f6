use dioxus::prelude::*;

use phrasebook_core::StudySession;
use phrasebook_core::model::{EntryId, PackUrl};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    CardVm, CatalogVm, EntryListItemVm, StudyIntent, StudyVm, filter_entries, map_catalog,
    map_study,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn StudyView() -> Element {
    let ctx = use_context::<AppContext>();
    let study = ctx.study();
    let load_gate = ctx.load_gate();

    let session = use_signal(StudySession::new);
    let pack_error = use_signal(|| None::<ViewError>);
    let mut selected = use_signal(String::new);
    let mut search = use_signal(String::new);

    let catalog_resource = {
        let study = study.clone();
        use_resource(move || {
            let study = study.clone();
            let mut selected = selected;
            async move {
                let catalog = study.open_catalog().await.map_err(|err| {
                    tracing::warn!(error = %err, "manifest unavailable");
                    ViewError::ManifestUnavailable
                })?;
                let vm = map_catalog(&catalog);
                selected.set(vm.selected_value().to_string());
                Ok::<_, ViewError>(vm)
            }
        })
    };

    let load_pack = {
        let study = study.clone();
        use_callback(move |()| {
            let raw = selected();
            if raw.is_empty() {
                return;
            }
            let url = PackUrl::new(raw);
            let study = study.clone();
            let load_gate = load_gate.clone();
            let ticket = load_gate.issue();
            let mut session = session;
            let mut pack_error = pack_error;

            spawn(async move {
                let result = study.load_pack(&url).await;
                if !load_gate.is_current(ticket) {
                    tracing::debug!(pack = %url, "discarding superseded pack load");
                    return;
                }
                match result {
                    Ok(loaded) => {
                        loaded.apply_to(&mut session.write());
                        pack_error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, pack = %url, "pack unavailable");
                        let shuffled = session.peek().is_shuffled();
                        let mut fresh = StudySession::new();
                        fresh.set_shuffled(shuffled);
                        session.set(fresh);
                        pack_error.set(Some(ViewError::PackUnavailable));
                    }
                }
            });
        })
    };

    let dispatch_intent = use_callback(move |intent: StudyIntent| {
        let mut session = session;
        let write = {
            let mut guard = session.write();
            match intent {
                StudyIntent::Next => {
                    guard.next();
                    None
                }
                StudyIntent::Prev => {
                    guard.prev();
                    None
                }
                StudyIntent::ToggleReveal => {
                    guard.toggle_reveal();
                    None
                }
                StudyIntent::SetShuffled(shuffled) => {
                    guard.set_shuffled(shuffled);
                    None
                }
                StudyIntent::JumpTo(id) => {
                    guard.jump_to_entry(&id);
                    None
                }
                StudyIntent::MarkKnown => guard.mark_current_known(),
                StudyIntent::ResetKnown => guard.reset_known(),
            }
        };

        // Stamped here, in click order; the commit itself runs in the background.
        if let Some(write) = write {
            let queued = study.queue(write);
            let study = study.clone();
            spawn(async move {
                study.commit(queued).await;
            });
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<StudyTestHandles>() {
                handles.register(dispatch_intent, load_pack, session, selected);
            }
        }
    }

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if evt.data.code() == Code::Space {
            evt.prevent_default();
            dispatch_intent.call(StudyIntent::ToggleReveal);
            return;
        }
        match evt.data.key() {
            Key::ArrowLeft => {
                evt.prevent_default();
                dispatch_intent.call(StudyIntent::Prev);
            }
            Key::ArrowRight => {
                evt.prevent_default();
                dispatch_intent.call(StudyIntent::Next);
            }
            Key::Character(value) if value.eq_ignore_ascii_case("k") => {
                evt.prevent_default();
                dispatch_intent.call(StudyIntent::MarkKnown);
            }
            _ => {}
        }
    });

    let catalog = match view_state_from_resource(&catalog_resource) {
        ViewState::Ready(vm) => vm,
        ViewState::Error(_) => CatalogVm::load_failed(),
        ViewState::Idle | ViewState::Loading => CatalogVm {
            options: Vec::new(),
            selected: None,
        },
    };
    let vm = if pack_error().is_some() {
        StudyVm::load_failed(session.read().is_shuffled())
    } else {
        map_study(&session.read())
    };
    let rows: Vec<EntryListItemVm> = filter_entries(&vm.entries, &search())
        .into_iter()
        .cloned()
        .collect();
    let selected_value = selected();
    let shuffled = vm.shuffled;

    rsx! {
        div { class: "page study-page", id: "study-root", tabindex: "0", onkeydown: on_key,
            header { class: "study-toolbar",
                select {
                    class: "pack-select",
                    id: "pack-select",
                    value: "{selected_value}",
                    onchange: move |evt| selected.set(evt.value()),
                    for pack in catalog.options.iter() {
                        option {
                            key: "{pack.value}",
                            value: "{pack.value}",
                            disabled: pack.disabled,
                            selected: pack.value == selected_value,
                            "{pack.label}"
                        }
                    }
                }
                button {
                    class: "btn btn-primary",
                    id: "load-pack",
                    r#type: "button",
                    onclick: move |_| load_pack.call(()),
                    "Load"
                }
                label { class: "shuffle-toggle",
                    input {
                        r#type: "checkbox",
                        checked: shuffled,
                        onchange: move |_| dispatch_intent.call(StudyIntent::SetShuffled(!shuffled)),
                    }
                    "Shuffle"
                }
            }

            if !vm.title.is_empty() {
                h2 { class: "study-title", "{vm.title}" }
            }

            if let Some(card) = vm.card.clone() {
                Flashcard { card }
            }

            div { class: "study-meta",
                span { class: "study-position", "{vm.position_label}" }
                span { class: "study-known", "{vm.known_label}" }
            }
            div { class: "progress",
                div { class: "progress__inner", style: "width: {vm.progress_width}" }
            }

            div { class: "study-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(StudyIntent::Prev),
                    "Prev"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(StudyIntent::ToggleReveal),
                    "Reveal"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(StudyIntent::Next),
                    "Next"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(StudyIntent::MarkKnown),
                    "Mark known"
                }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(StudyIntent::ResetKnown),
                    "Reset known"
                }
            }

            section { class: "entry-list",
                input {
                    class: "search-input",
                    r#type: "text",
                    placeholder: "Search entries",
                    value: "{search()}",
                    oninput: move |evt| search.set(evt.value()),
                    // Typing must not trigger the card shortcuts.
                    onkeydown: move |evt: KeyboardEvent| evt.stop_propagation(),
                }
                ul { class: "entries",
                    for item in rows {
                        EntryRow {
                            key: "{item.id}",
                            item: item.clone(),
                            on_go: move |id: EntryId| dispatch_intent.call(StudyIntent::JumpTo(id)),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Flashcard(card: CardVm) -> Element {
    let class = if card.known { "card card--known" } else { "card" };

    rsx! {
        article { class: "{class}", id: "card",
            p { class: "card__source", "{card.source}" }
            p { class: "card__translation", "{card.translation}" }
            p { class: "card__pron", "{card.pron}" }
            div { class: "card__chips",
                for chip in card.chips.iter() {
                    span { class: "chip", "{chip}" }
                }
            }
        }
    }
}

#[component]
fn EntryRow(item: EntryListItemVm, on_go: EventHandler<EntryId>) -> Element {
    let class = if item.active { "entry entry--active" } else { "entry" };
    let id = item.id.clone();

    rsx! {
        li { class: "{class}", "data-id": "{item.id}",
            div {
                p { "{item.no}" }
                p { class: "small", "{item.en}" }
            }
            div {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_go.call(id.clone()),
                    "Go"
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct StudyTestHandles {
    dispatch: Rc<RefCell<Option<Callback<StudyIntent>>>>,
    load: Rc<RefCell<Option<Callback<()>>>>,
    session: Rc<RefCell<Option<Signal<StudySession>>>>,
    selected: Rc<RefCell<Option<Signal<String>>>>,
}

#[cfg(test)]
impl StudyTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<StudyIntent>,
        load: Callback<()>,
        session: Signal<StudySession>,
        selected: Signal<String>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.load.borrow_mut() = Some(load);
        *self.session.borrow_mut() = Some(session);
        *self.selected.borrow_mut() = Some(selected);
    }

    pub(crate) fn dispatch(&self) -> Callback<StudyIntent> {
        (*self.dispatch.borrow()).expect("study dispatch registered")
    }

    pub(crate) fn load(&self) -> Callback<()> {
        (*self.load.borrow()).expect("study load registered")
    }

    pub(crate) fn session(&self) -> Signal<StudySession> {
        (*self.session.borrow()).expect("study session registered")
    }

    pub(crate) fn selected(&self) -> Signal<String> {
        (*self.selected.borrow()).expect("study selection registered")
    }
}
