use std::time::Duration;

use dioxus::prelude::{ReadableExt, WritableExt};

use phrasebook_core::model::{EntryId, PackUrl};
use storage::repository::{KeyValueStore, Storage};

use super::test_harness::{
    A1_CORE, A2_TRAVEL, MANIFEST, StaticTransport, ViewHarness, full_transport,
    setup_study_harness, setup_study_harness_with_storage,
};
use crate::vm::StudyIntent;

async fn loaded(mut harness: ViewHarness) -> ViewHarness {
    harness.rebuild();
    harness.drive_async().await;
    let load = harness.handles.load();
    harness.in_runtime(|| load.call(()));
    harness.drive_async().await;
    harness
}

fn dispatch(harness: &ViewHarness, intent: StudyIntent) {
    let dispatch = harness.handles.dispatch();
    harness.in_runtime(|| dispatch.call(intent));
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_lists_manifest_packs() {
    let mut harness = setup_study_harness(full_transport());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("A1 Core"), "missing first pack in {html}");
    assert!(html.contains("A2 Travel"), "missing second pack in {html}");
    assert!(html.contains("0 / 0"), "missing empty position in {html}");
    assert!(!html.contains("Failed to load"), "unexpected failure in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_loads_selected_pack_hidden() {
    let mut harness = loaded(setup_study_harness(full_transport())).await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains(r#"<p class="card__source">Hei</p>"#),
        "missing first entry in {html}"
    );
    assert!(html.contains("1 / 3"), "missing position in {html}");
    assert!(html.contains("••••"), "translation should be masked in {html}");
    assert!(html.contains("width: 0%"), "missing progress in {html}");
    assert!(html.contains("God morgen"), "missing list entry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_mark_known_persists_and_advances() {
    let storage = Storage::in_memory();
    let mut harness =
        loaded(setup_study_harness_with_storage(full_transport(), storage.clone())).await;

    dispatch(&harness, StudyIntent::MarkKnown);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("2 / 3"), "should advance after marking in {html}");
    assert!(html.contains("width: 33%"), "missing progress in {html}");
    let stored = storage
        .local
        .get("known:packs/a1-core.json")
        .await
        .expect("read known");
    assert_eq!(stored.as_deref(), Some(r#"["a1-0001"]"#));
    let last = storage.local.get("last-pack-url").await.expect("read last");
    assert_eq!(last.as_deref(), Some("packs/a1-core.json"));

    dispatch(&harness, StudyIntent::ResetKnown);
    harness.drive_async().await;
    let stored = storage
        .local
        .get("known:packs/a1-core.json")
        .await
        .expect("read known");
    assert_eq!(stored.as_deref(), Some("[]"));
    assert!(harness.render().contains("width: 0%"));
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_reveal_and_jump() {
    let mut harness = loaded(setup_study_harness(full_transport())).await;

    dispatch(&harness, StudyIntent::Next);
    dispatch(&harness, StudyIntent::ToggleReveal);
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Takk = Thanks"), "missing token chip in {html}");
    assert!(html.contains("tahk"), "missing pronunciation in {html}");

    dispatch(&harness, StudyIntent::JumpTo(EntryId::new("a1-0003")));
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains(r#"<p class="card__translation">Good morning</p>"#),
        "jump should reveal in {html}"
    );
    assert!(html.contains("3 / 3"), "missing position in {html}");
    assert!(html.contains("entry entry--active"), "missing active row in {html}");

    let session = harness.handles.session();
    let revealed = harness.in_runtime(|| session.peek().is_revealed());
    assert!(revealed);
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_manifest_failure_placeholder() {
    let mut harness = setup_study_harness(StaticTransport::default());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Failed to load manifest"),
        "missing manifest placeholder in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_pack_failure_placeholder() {
    let storage = Storage::in_memory();
    storage
        .local
        .set("last-pack-url", "packs/a2-travel.json")
        .await
        .expect("seed last pack");
    let transport = StaticTransport::default()
        .with("packs/manifest.json", MANIFEST)
        .with("packs/a1-core.json", A1_CORE);
    let harness = loaded(setup_study_harness_with_storage(transport, storage)).await;

    let html = harness.render();
    assert!(html.contains("Failed to load pack"), "missing placeholder in {html}");
    assert!(html.contains("0 / 0"), "missing empty position in {html}");
    assert!(html.contains("width: 0%"), "missing empty progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_slow_earlier_load_does_not_replace_later_pack() {
    let transport = full_transport()
        .with("packs/a2-travel.json", A2_TRAVEL)
        .delayed("packs/a1-core.json", Duration::from_millis(150));
    let mut harness = setup_study_harness(transport);
    harness.rebuild();
    harness.drive_async().await;

    let load = harness.handles.load();
    let mut selected = harness.handles.selected();
    harness.in_runtime(|| {
        selected.set("packs/a1-core.json".to_string());
        load.call(());
        selected.set("packs/a2-travel.json".to_string());
        load.call(());
    });
    harness.drive_for(Duration::from_millis(400)).await;

    let html = harness.render();
    assert!(
        html.contains(r#"<p class="card__source">Billett</p>"#),
        "later pack should stay on screen in {html}"
    );
    assert!(!html.contains("Hei"), "slow pack leaked into {html}");
    assert!(html.contains("1 / 2"), "missing position in {html}");

    let session = harness.handles.session();
    let pack_url = harness.in_runtime(|| session.peek().pack_url().cloned());
    assert_eq!(pack_url, Some(PackUrl::new("packs/a2-travel.json")));
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_rapid_marks_then_reset_persist_empty() {
    let storage = Storage::in_memory();
    let mut harness =
        loaded(setup_study_harness_with_storage(full_transport(), storage.clone())).await;

    for _ in 0..5 {
        dispatch(&harness, StudyIntent::MarkKnown);
    }
    dispatch(&harness, StudyIntent::ResetKnown);
    harness.drive_async().await;

    let stored = storage
        .local
        .get("known:packs/a1-core.json")
        .await
        .expect("read known");
    assert_eq!(stored.as_deref(), Some("[]"));
}
