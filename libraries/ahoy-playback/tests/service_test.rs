//! Media service worker tests
//!
//! Run the real worker task against the fake host and observe it only
//! through the public surface: transport calls, browse queries and
//! snapshots.

mod common;

use std::sync::Arc;
use std::time::Duration;

use ahoy_catalog::{CatalogClient, CatalogConfig, CatalogStore, NodeKind};
use ahoy_core::{Catalog, NodeId};
use ahoy_playback::{MediaService, PlaybackConfig, PlaybackSnapshot, PlaybackState};
use common::{sample_catalog, FakeHost};
use tokio::sync::broadcast;
use tokio::time::timeout;

fn spawn_service(catalog: Catalog, host: &FakeHost) -> MediaService {
    let client = CatalogClient::new(CatalogConfig::new("http://127.0.0.1:1")).unwrap();
    MediaService::spawn(
        PlaybackConfig::default(),
        Arc::new(CatalogStore::with_catalog(catalog)),
        client,
        host.factory(),
        host.focus(),
    )
}

async fn next_snapshot(rx: &mut broadcast::Receiver<PlaybackSnapshot>) -> PlaybackSnapshot {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot channel closed")
}

async fn wait_for_state(service: &MediaService, state: PlaybackState) -> PlaybackSnapshot {
    let mut watch = service.watch();
    timeout(Duration::from_secs(5), async {
        loop {
            if watch.borrow_and_update().state == state {
                return watch.borrow().clone();
            }
            watch.changed().await.expect("worker stopped");
        }
    })
    .await
    .expect("timed out waiting for state")
}

#[tokio::test]
async fn test_snapshots_arrive_in_transition_order() {
    let host = FakeHost::auto_preparing();
    let service = spawn_service(sample_catalog(), &host);
    let mut updates = service.subscribe();

    service.play_by_id("track:A").unwrap();
    assert_eq!(next_snapshot(&mut updates).await.state, PlaybackState::Buffering);
    assert_eq!(next_snapshot(&mut updates).await.state, PlaybackState::Playing);

    service.pause().unwrap();
    service.seek_to(30_000).unwrap();
    service.skip_next().unwrap();

    let paused = next_snapshot(&mut updates).await;
    assert_eq!(paused.state, PlaybackState::Paused);
    let seeked = next_snapshot(&mut updates).await;
    assert_eq!((seeked.state, seeked.position_ms), (PlaybackState::Paused, 30_000));
    let next = next_snapshot(&mut updates).await;
    assert_eq!(next.state, PlaybackState::Buffering);
    assert_eq!(next.metadata.unwrap().title, "Low Tide");
    assert_eq!(next_snapshot(&mut updates).await.state, PlaybackState::Playing);

    assert_eq!(service.snapshot().state, PlaybackState::Playing);
    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_initial_snapshot_is_idle() {
    let host = FakeHost::new();
    let service = spawn_service(sample_catalog(), &host);

    let snapshot = service.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert_eq!(snapshot.position_ms, 0);
    assert!(snapshot.metadata.is_none());
}

#[tokio::test]
async fn test_callbacks_from_host_threads_are_serialized() {
    let host = FakeHost::new();
    let service = spawn_service(sample_catalog(), &host);

    service.play_by_id("episode:e3").unwrap();
    wait_for_state(&service, PlaybackState::Buffering).await;

    let callbacks = host.last_callbacks();
    std::thread::spawn(move || callbacks.prepared())
        .join()
        .unwrap();

    let snapshot = wait_for_state(&service, PlaybackState::Playing).await;
    assert_eq!(snapshot.metadata.unwrap().subtitle, "Tide Talk");

    service.skip_next().unwrap();
    wait_for_state(&service, PlaybackState::Buffering).await;
    assert_eq!(
        host.loads().last().map(String::as_str),
        Some("https://app.ahoy.ooo/episodes/4.mp3")
    );

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_focus_loss_pauses() {
    let host = FakeHost::auto_preparing();
    let service = spawn_service(sample_catalog(), &host);

    service.play_by_id("track:B").unwrap();
    wait_for_state(&service, PlaybackState::Playing).await;
    host.set_position(9_000);
    host.lose_focus();

    let snapshot = wait_for_state(&service, PlaybackState::Paused).await;
    assert_eq!(snapshot.position_ms, 9_000);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_browse_reads_current_catalog() {
    let host = FakeHost::new();
    let service = spawn_service(sample_catalog(), &host);

    let root = service.children(service.root()).await;
    assert_eq!(root.len(), 3);

    let episodes = service.children(NodeId::podcast("tide-talk")).await;
    assert_eq!(episodes.len(), 5);
    assert!(episodes.iter().all(|n| n.kind == NodeKind::Playable));

    assert!(service.children_of("ALBUMS").await.is_empty());
}

#[tokio::test]
async fn test_failed_refresh_keeps_catalog() {
    let host = FakeHost::new();
    let service = spawn_service(sample_catalog(), &host);

    let summary = service.refresh_catalog().await.unwrap();

    assert!(!summary.is_complete());
    assert_eq!(service.catalog().snapshot().tracks.len(), 3);
    assert_eq!(service.children(NodeId::Music).await.len(), 3);
}

#[tokio::test]
async fn test_shutdown_releases_player() {
    let host = FakeHost::auto_preparing();
    let service = spawn_service(sample_catalog(), &host);
    let mut updates = service.subscribe();

    service.play_by_id("track:C").unwrap();
    next_snapshot(&mut updates).await;
    next_snapshot(&mut updates).await;

    service.shutdown().await.unwrap();

    assert_eq!(host.live_players(), 0);
    assert_eq!(host.focus_releases(), 1);
}

#[tokio::test]
async fn test_dropping_handle_stops_worker() {
    let host = FakeHost::auto_preparing();
    let service = spawn_service(sample_catalog(), &host);
    let mut updates = service.subscribe();

    service.play_by_id("track:A").unwrap();
    next_snapshot(&mut updates).await;
    next_snapshot(&mut updates).await;
    drop(service);

    let last = timeout(Duration::from_secs(5), async {
        let mut last = None;
        while let Ok(snapshot) = updates.recv().await {
            last = Some(snapshot);
        }
        last
    })
    .await
    .expect("worker did not stop");

    assert_eq!(last.map(|s| s.state), Some(PlaybackState::Stopped));
    assert_eq!(host.live_players(), 0);
}
