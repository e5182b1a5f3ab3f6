use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_persists_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("last-pack-url").await.unwrap(), None);

    repo.set("last-pack-url", "packs/a1-core.json").await.unwrap();
    repo.set("known:packs/a1-core.json", r#"["a1-0001"]"#)
        .await
        .unwrap();

    assert_eq!(
        repo.get("last-pack-url").await.unwrap().as_deref(),
        Some("packs/a1-core.json")
    );
    assert_eq!(
        repo.get("known:packs/a1-core.json").await.unwrap().as_deref(),
        Some(r#"["a1-0001"]"#)
    );
}

#[tokio::test]
async fn sqlite_set_overwrites_and_remove_deletes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set("known:a", "[]").await.unwrap();
    repo.set("known:a", r#"["x","y"]"#).await.unwrap();
    assert_eq!(
        repo.get("known:a").await.unwrap().as_deref(),
        Some(r#"["x","y"]"#)
    );

    repo.remove("known:a").await.unwrap();
    repo.remove("known:a").await.unwrap();
    assert_eq!(repo.get("known:a").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn sqlite_storage_keeps_session_cache_in_memory() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");

    storage
        .session
        .set("manifest-cache", r#"{"packs":[]}"#)
        .await
        .unwrap();
    assert_eq!(storage.local.get("manifest-cache").await.unwrap(), None);

    storage.local.set("last-pack-url", "p.json").await.unwrap();
    assert_eq!(storage.session.get("last-pack-url").await.unwrap(), None);
}
