//! View Controller Integration Tests
//!
//! Tests for screen state transitions, the save toggle, and discarding
//! superseded loads.

mod common;

use std::sync::Arc;

use common::{english, ScriptedGateway, ASSET_HOST};
use mangashelf::core::Aggregator;
use mangashelf::domain::{FeedEntry, ItemRecord, RelationshipKind};
use mangashelf::library::{JsonLibraryStore, LibraryStore, MemoryLibraryStore};
use mangashelf::view::{ViewController, ViewError, ViewState};
use tempfile::TempDir;

fn item(id: &str, title: &str) -> ItemRecord {
    ItemRecord::new(id)
        .with_title(english(title))
        .with_relationship(RelationshipKind::CoverArt, "cov1")
}

fn gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_item(item("abc", "Vagabond"))
        .with_item(item("def", "Berserk"))
        .with_cover("cov1", "x.jpg")
        .with_feed(
            "abc",
            vec![FeedEntry::new("c1", "1"), FeedEntry::new("c2", "2")],
        )
}

fn controller_with(
    gateway: ScriptedGateway,
    library: Arc<dyn LibraryStore>,
) -> Arc<ViewController> {
    let aggregator = Arc::new(Aggregator::new(Arc::new(gateway), library.clone(), ASSET_HOST));
    Arc::new(ViewController::new(aggregator, library))
}

#[tokio::test]
async fn test_activate_loads_view() {
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway(), library);

    controller.activate("abc").await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.item_id.as_deref(), Some("abc"));
    let view = snapshot.view().expect("view should be loaded");
    assert_eq!(view.fields.title, "Vagabond");
    assert!(!snapshot.is_saved);
}

#[tokio::test]
async fn test_activate_unknown_item_is_not_found() {
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway(), library);

    controller.activate("nope").await;

    assert_eq!(controller.snapshot().state, ViewState::NotFound);
    assert!(matches!(
        controller.toggle_save().await,
        Err(ViewError::NotLoaded)
    ));
}

#[tokio::test]
async fn test_toggle_save_adds_then_removes() {
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway(), library.clone());
    controller.activate("abc").await;

    assert!(controller.toggle_save().await.unwrap());
    assert!(controller.is_saved());
    assert!(library.contains("abc").await.unwrap());

    let entries = library.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Vagabond");
    assert_eq!(
        entries[0].cover_image_url.as_deref(),
        Some("https://uploads.mangadex.org/covers/abc/x.jpg")
    );
    assert_eq!(entries[0].chapter_count, 2);
    assert!(entries[0].saved_at.is_some());

    assert!(!controller.toggle_save().await.unwrap());
    assert!(!controller.is_saved());
    assert!(!library.contains("abc").await.unwrap());
}

#[tokio::test]
async fn test_loaded_view_tracks_saved_flag() {
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway(), library);
    controller.activate("abc").await;

    controller.toggle_save().await.unwrap();

    let snapshot = controller.snapshot();
    assert!(snapshot.is_saved);
    assert!(snapshot.view().unwrap().is_saved);
}

#[tokio::test]
async fn test_toggle_publishes_a_new_view() {
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway(), library);
    controller.activate("abc").await;

    let before = controller.snapshot();
    controller.toggle_save().await.unwrap();
    let after = controller.snapshot();

    let old_view = before.view().unwrap();
    let new_view = after.view().unwrap();
    assert!(!old_view.is_saved);
    assert!(new_view.is_saved);
    assert_eq!(new_view, &old_view.with_saved(true));
    assert_eq!(after.is_saved, new_view.is_saved);
}

#[tokio::test]
async fn test_reactivation_picks_up_saved_state() {
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway(), library);

    controller.activate("abc").await;
    controller.toggle_save().await.unwrap();

    controller.activate("def").await;
    assert!(!controller.is_saved());

    controller.activate("abc").await;
    assert!(controller.is_saved());
}

#[tokio::test]
async fn test_toggles_never_duplicate_entries() {
    let temp = TempDir::new().unwrap();
    let library: Arc<dyn LibraryStore> =
        Arc::new(JsonLibraryStore::new(temp.path().join("library.json")));
    let controller = controller_with(gateway(), library.clone());

    for id in ["abc", "def", "abc", "abc", "def"] {
        controller.activate(id).await;
        controller.toggle_save().await.unwrap();
    }

    let entries = library.entries().await.unwrap();
    let mut ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), entries.len());
    // abc toggled three times, def twice
    assert_eq!(ids, vec!["abc"]);
}

#[tokio::test]
async fn test_superseded_load_is_discarded() {
    let (gateway, gate) = gateway().with_item(item("slow", "Slow")).with_gate("slow");
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway, library);

    let mut updates = controller.subscribe();
    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.activate("slow").await })
    };
    updates
        .wait_for(|s| s.item_id.as_deref() == Some("slow"))
        .await
        .unwrap();

    controller.activate("abc").await;
    gate.notify_one();
    slow.await.unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.item_id.as_deref(), Some("abc"));
    assert_eq!(snapshot.view().unwrap().fields.title, "Vagabond");
}

#[tokio::test]
async fn test_deactivate_discards_in_flight_load() {
    let (gateway, gate) = gateway().with_item(item("slow", "Slow")).with_gate("slow");
    let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
    let controller = controller_with(gateway, library.clone());

    let mut updates = controller.subscribe();
    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.activate("slow").await })
    };
    updates
        .wait_for(|s| s.state == ViewState::Loading)
        .await
        .unwrap();

    controller.deactivate();
    gate.notify_one();
    slow.await.unwrap();

    assert_eq!(controller.snapshot().state, ViewState::Idle);
    assert!(library.entries().await.unwrap().is_empty());
}
