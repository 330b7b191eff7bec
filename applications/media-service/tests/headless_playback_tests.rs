//! End-to-end playback through the simulated output
//!
//! Time is paused, so prepare delays and stream lengths elapse instantly
//! while keeping their order.

use ahoy_catalog::{CatalogClient, CatalogConfig, CatalogStore};
use ahoy_core::Catalog;
use ahoy_media_service::{HeadlessFocus, SimulatedOutput};
use ahoy_playback::{MediaService, PlaybackConfig, PlaybackSnapshot, PlaybackState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

fn catalog() -> Catalog {
    Catalog::new(
        Catalog::tracks_from_values(
            &[
                json!({ "id": "1", "title": "Harbour Lights", "artist": "The Moorings", "audio_url": "/audio/1.mp3" }),
                json!({ "id": "2", "title": "Low Tide", "artist": "Dock Street", "audio_url": "/audio/2.mp3" }),
                json!({ "id": "3", "title": "Bad Link", "audio_url": "ftp://old.example/3.mp3" }),
            ],
            "https://app.ahoy.ooo",
        ),
        Vec::new(),
        Vec::new(),
    )
}

fn spawn(output: SimulatedOutput) -> MediaService {
    let client = CatalogClient::new(CatalogConfig::default()).unwrap();
    MediaService::spawn(
        PlaybackConfig::default(),
        Arc::new(CatalogStore::with_catalog(catalog())),
        client,
        Box::new(output),
        Box::new(HeadlessFocus),
    )
}

async fn next(updates: &mut broadcast::Receiver<PlaybackSnapshot>) -> PlaybackSnapshot {
    tokio::time::timeout(Duration::from_secs(60), updates.recv())
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot channel closed")
}

#[tokio::test(start_paused = true)]
async fn test_play_reaches_playing_after_prepare_delay() {
    let service = spawn(SimulatedOutput::new(Duration::from_millis(250)));
    let mut updates = service.subscribe();

    service.play_by_id("track:1").unwrap();

    let buffering = next(&mut updates).await;
    assert_eq!(buffering.state, PlaybackState::Buffering);
    assert_eq!(buffering.metadata.unwrap().title, "Harbour Lights");

    assert_eq!(next(&mut updates).await.state, PlaybackState::Playing);

    tokio::time::sleep(Duration::from_secs(5)).await;
    service.pause().unwrap();
    let paused = next(&mut updates).await;
    assert_eq!(paused.state, PlaybackState::Paused);
    assert!(paused.position_ms >= 5_000);

    service.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_completed_stream_advances_queue() {
    let output = SimulatedOutput::new(Duration::from_millis(100))
        .with_stream_length(Duration::from_secs(30));
    let service = spawn(output);
    let mut updates = service.subscribe();

    service.play_by_id("track:1").unwrap();
    assert_eq!(next(&mut updates).await.state, PlaybackState::Buffering);
    assert_eq!(next(&mut updates).await.state, PlaybackState::Playing);

    let advanced = next(&mut updates).await;
    assert_eq!(advanced.state, PlaybackState::Buffering);
    assert_eq!(advanced.metadata.unwrap().title, "Low Tide");

    service.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_url_surfaces_error() {
    let service = spawn(SimulatedOutput::new(Duration::from_millis(100)));
    let mut updates = service.subscribe();

    service.play_by_id("track:3").unwrap();

    let failed = next(&mut updates).await;
    assert_eq!(failed.state, PlaybackState::Error);
    assert!(failed.error.unwrap().contains("Unsupported stream URL"));

    service.play_by_id("track:2").unwrap();
    assert_eq!(next(&mut updates).await.state, PlaybackState::Buffering);
    assert_eq!(next(&mut updates).await.state, PlaybackState::Playing);

    service.shutdown().await.unwrap();
}
