//! Shared fakes for playback tests
//!
//! `FakeHost` stands in for the host platform: it hands out players that
//! record every call, and a focus arbiter that can grant, deny or revoke.

use std::sync::{Arc, Mutex, MutexGuard};

use ahoy_catalog::CatalogStore;
use ahoy_core::Catalog;
use ahoy_playback::{
    AudioFocus, AudioPlayer, ControllerEvent, FocusListener, PlaybackConfig, PlaybackController,
    PlaybackError, PlayerFactory, Result, StreamCallbacks,
};
use serde_json::json;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    Load(String),
    Start,
    Pause,
    Stop,
    Seek(u64),
}

#[derive(Default)]
struct HostState {
    calls: Vec<PlayerCall>,
    callbacks: Vec<StreamCallbacks>,
    position_ms: u64,
    playing: bool,
    live_players: usize,
    max_live_players: usize,
    reject_loads: bool,
    auto_prepare: bool,
    deny_focus: bool,
    focus_requests: usize,
    focus_releases: usize,
    focus_listener: Option<FocusListener>,
}

#[derive(Clone, Default)]
pub struct FakeHost(Arc<Mutex<HostState>>);

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose players report `prepared` as soon as they are loaded
    pub fn auto_preparing() -> Self {
        let host = Self::new();
        host.state().auto_prepare = true;
        host
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.0.lock().unwrap()
    }

    pub fn factory(&self) -> Box<dyn PlayerFactory> {
        Box::new(FakeFactory(self.clone()))
    }

    pub fn focus(&self) -> Box<dyn AudioFocus> {
        Box::new(FakeFocus(self.clone()))
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.state().calls.clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlayerCall::Load(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Callbacks handed to the `n`th load
    pub fn callbacks(&self, n: usize) -> StreamCallbacks {
        self.state().callbacks[n].clone()
    }

    pub fn last_callbacks(&self) -> StreamCallbacks {
        self.state().callbacks.last().cloned().unwrap()
    }

    pub fn set_position(&self, position_ms: u64) {
        self.state().position_ms = position_ms;
    }

    pub fn live_players(&self) -> usize {
        self.state().live_players
    }

    pub fn max_live_players(&self) -> usize {
        self.state().max_live_players
    }

    pub fn reject_loads(&self, reject: bool) {
        self.state().reject_loads = reject;
    }

    pub fn deny_focus(&self) {
        self.state().deny_focus = true;
    }

    pub fn focus_requests(&self) -> usize {
        self.state().focus_requests
    }

    pub fn focus_releases(&self) -> usize {
        self.state().focus_releases
    }

    /// Revoke focus the way another app would
    pub fn lose_focus(&self) {
        let listener = self.state().focus_listener.clone();
        listener.expect("focus was never requested").lost();
    }
}

struct FakeFactory(FakeHost);

impl PlayerFactory for FakeFactory {
    fn create(&mut self) -> Box<dyn AudioPlayer> {
        let mut state = self.0.state();
        state.live_players += 1;
        state.max_live_players = state.max_live_players.max(state.live_players);
        Box::new(FakePlayer(self.0.clone()))
    }
}

struct FakePlayer(FakeHost);

impl AudioPlayer for FakePlayer {
    fn load(&mut self, url: &str, callbacks: StreamCallbacks) -> Result<()> {
        let mut state = self.0.state();
        state.calls.push(PlayerCall::Load(url.to_string()));
        if state.reject_loads {
            return Err(PlaybackError::load_failure(1, format!("unsupported url {url}")));
        }
        state.position_ms = 0;
        state.playing = false;
        if state.auto_prepare {
            callbacks.prepared();
        }
        state.callbacks.push(callbacks);
        Ok(())
    }

    fn start(&mut self) {
        let mut state = self.0.state();
        state.calls.push(PlayerCall::Start);
        state.playing = true;
    }

    fn pause(&mut self) {
        let mut state = self.0.state();
        state.calls.push(PlayerCall::Pause);
        state.playing = false;
    }

    fn stop(&mut self) {
        let mut state = self.0.state();
        state.calls.push(PlayerCall::Stop);
        state.playing = false;
    }

    fn seek(&mut self, position_ms: u64) {
        let mut state = self.0.state();
        state.calls.push(PlayerCall::Seek(position_ms));
        state.position_ms = position_ms;
    }

    fn position_ms(&self) -> u64 {
        self.0.state().position_ms
    }

    fn is_playing(&self) -> bool {
        self.0.state().playing
    }
}

impl Drop for FakePlayer {
    fn drop(&mut self) {
        self.0.state().live_players -= 1;
    }
}

struct FakeFocus(FakeHost);

impl AudioFocus for FakeFocus {
    fn request(&mut self, listener: FocusListener) -> bool {
        let mut state = self.0.state();
        state.focus_requests += 1;
        state.focus_listener = Some(listener);
        !state.deny_focus
    }

    fn release(&mut self) {
        self.0.state().focus_releases += 1;
    }
}

// ===== Catalog Fixtures =====

pub const BASE: &str = "https://app.ahoy.ooo";

/// Tracks A, B, C plus a five-episode show
pub fn sample_catalog() -> Catalog {
    Catalog::new(
        Catalog::tracks_from_values(
            &[
                json!({ "id": "A", "title": "Harbour Lights", "artist": "The Moorings", "audio_url": "/audio/a.mp3", "cover_art": "/img/a.png" }),
                json!({ "id": "B", "title": "Low Tide", "artist": "Dock Street", "url": "https://cdn.example/b.mp3" }),
                json!({ "id": "C", "title": "Gulls", "artist": "Dock Street", "preview_url": "https://cdn.example/c.mp3" }),
            ],
            BASE,
        ),
        Vec::new(),
        Catalog::shows_from_values(
            &[json!({
                "slug": "tide-talk",
                "title": "Tide Talk",
                "artwork": "https://cdn.example/tide.png",
                "episodes": (0..5)
                    .map(|i| json!({ "id": format!("e{i}"), "title": format!("Episode {i}"), "audio_url": format!("/episodes/{i}.mp3") }))
                    .collect::<Vec<_>>(),
            })],
            BASE,
        ),
    )
}

/// Tracks where the middle one has no audio
pub fn catalog_with_silent_track() -> Catalog {
    Catalog::new(
        Catalog::tracks_from_values(
            &[
                json!({ "id": "A", "title": "One", "audio_url": "https://cdn.example/a.mp3" }),
                json!({ "id": "S", "title": "Silent" }),
                json!({ "id": "C", "title": "Three", "audio_url": "https://cdn.example/c.mp3" }),
            ],
            BASE,
        ),
        Vec::new(),
        Vec::new(),
    )
}

// ===== Controller Harness =====

/// Controller wired to a fake host, with its event channel pumped by hand
pub struct Harness {
    pub controller: PlaybackController,
    pub host: FakeHost,
    pub store: Arc<CatalogStore>,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl Harness {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_host(catalog, FakeHost::new())
    }

    pub fn with_host(catalog: Catalog, host: FakeHost) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let store = Arc::new(CatalogStore::with_catalog(catalog));
        let controller = PlaybackController::new(
            PlaybackConfig::default(),
            Arc::clone(&store),
            host.factory(),
            host.focus(),
            tx,
        );
        Self {
            controller,
            host,
            store,
            events,
        }
    }

    pub fn handle(&mut self, event: ControllerEvent) {
        self.controller.handle(event);
        self.pump();
    }

    /// Apply every callback the fakes have queued
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle(event);
        }
    }

    pub fn play(&mut self, id: &str) {
        self.handle(ControllerEvent::PlayById(id.to_string()));
    }

    /// Play `id` and report the stream prepared
    pub fn play_prepared(&mut self, id: &str) {
        self.play(id);
        self.host.last_callbacks().prepared();
        self.pump();
    }
}
