//! Playback controller
//!
//! Synchronous state machine owning the single active stream. Commands and
//! host callbacks arrive as [`ControllerEvent`]s; every transition that
//! changes state or position queues a fresh [`PlaybackSnapshot`] which the
//! owner drains with [`PlaybackController::drain_snapshots`].

use std::sync::Arc;

use ahoy_catalog::CatalogStore;
use ahoy_core::{CatalogItem, NodeId};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::error::{PlaybackError, Result};
use crate::events::ControllerEvent;
use crate::player::{AudioFocus, AudioPlayer, FocusListener, PlayerFactory, StreamCallbacks};
use crate::queue::{PlayQueue, Retreat};
use crate::types::{NowPlaying, PlaybackConfig, PlaybackSnapshot, PlaybackState, TransportAction};

/// Playback state machine
///
/// Holds at most one player at a time. Each load bumps the load generation;
/// stream callbacks tagged with any other generation are ignored.
pub struct PlaybackController {
    config: PlaybackConfig,
    catalog: Arc<CatalogStore>,
    factory: Box<dyn PlayerFactory>,
    focus: Box<dyn AudioFocus>,
    // Handed to players and focus listeners so callbacks re-enter as events
    events: UnboundedSender<ControllerEvent>,

    player: Option<Box<dyn AudioPlayer>>,
    generation: u64,
    // Whether the current player has reported `prepared`
    prepared: bool,
    queue: PlayQueue,

    state: PlaybackState,
    position_ms: u64,
    metadata: Option<NowPlaying>,
    error: Option<String>,

    snapshot: PlaybackSnapshot,
    pending_snapshots: Vec<PlaybackSnapshot>,
}

impl PlaybackController {
    /// Create an idle controller
    pub fn new(
        config: PlaybackConfig,
        catalog: Arc<CatalogStore>,
        factory: Box<dyn PlayerFactory>,
        focus: Box<dyn AudioFocus>,
        events: UnboundedSender<ControllerEvent>,
    ) -> Self {
        Self {
            config,
            catalog,
            factory,
            focus,
            events,
            player: None,
            generation: 0,
            prepared: false,
            queue: PlayQueue::new(),
            state: PlaybackState::Idle,
            position_ms: 0,
            metadata: None,
            error: None,
            snapshot: PlaybackSnapshot::idle(),
            pending_snapshots: Vec::new(),
        }
    }

    /// Apply one event
    ///
    /// Commands that do not apply in the current state are logged and
    /// ignored; nothing here is fatal.
    pub fn handle(&mut self, event: ControllerEvent) {
        let result = match event {
            ControllerEvent::PlayById(id) => self.play_by_id(&id),
            ControllerEvent::Play => self.play(),
            ControllerEvent::Pause => self.pause(),
            ControllerEvent::Stop => {
                self.stop();
                Ok(())
            }
            ControllerEvent::SkipNext => self.skip_next(),
            ControllerEvent::SkipPrevious => self.skip_previous(),
            ControllerEvent::SeekTo { position_ms } => self.seek_to(position_ms),
            ControllerEvent::Prepared { generation } if generation == self.generation => {
                self.on_prepared();
                Ok(())
            }
            ControllerEvent::Completed { generation } if generation == self.generation => {
                self.on_completed()
            }
            ControllerEvent::LoadError {
                generation,
                code,
                detail,
            } if generation == self.generation => {
                self.on_load_error(code, detail);
                Ok(())
            }
            ControllerEvent::Prepared { generation }
            | ControllerEvent::Completed { generation }
            | ControllerEvent::LoadError { generation, .. } => {
                debug!(
                    generation,
                    current = self.generation,
                    "Ignoring stale stream callback"
                );
                Ok(())
            }
            ControllerEvent::FocusLost => {
                self.on_focus_lost();
                Ok(())
            }
            ControllerEvent::Shutdown => {
                self.shutdown();
                Ok(())
            }
        };

        if let Err(e) = result {
            debug!(error = %e, state = ?self.state, "Command ignored");
        }
    }

    // ===== Playback Control =====

    /// Play the item behind an encoded node id
    ///
    /// Replaces the queue with the item's context. Unknown ids and items
    /// without audio leave everything untouched.
    pub fn play_by_id(&mut self, id: &str) -> Result<()> {
        let node = NodeId::decode(id).map_err(|_| PlaybackError::NotFound(id.to_string()))?;
        let catalog = self.catalog.snapshot();
        let queue = PlayQueue::start_queue(&catalog, &node)?;

        match queue.current() {
            Some(item) if item.is_playable() => {}
            _ => return Err(PlaybackError::Unplayable(id.to_string())),
        }

        self.queue = queue;
        self.load_current()
    }

    /// Resume a loaded stream
    pub fn play(&mut self) -> Result<()> {
        if !self.prepared || self.player.is_none() {
            return Err(PlaybackError::NoStreamLoaded);
        }
        if self.player.as_ref().is_some_and(|p| p.is_playing()) {
            return Ok(());
        }

        self.request_focus();
        if let Some(player) = self.player.as_mut() {
            player.start();
        }
        self.transition(PlaybackState::Playing);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        let player = self.player.as_mut().ok_or(PlaybackError::NoStreamLoaded)?;
        player.pause();
        self.transition(PlaybackState::Paused);
        Ok(())
    }

    /// Release output and focus
    ///
    /// Queue and metadata survive, so the snapshot still names the last item.
    pub fn stop(&mut self) {
        self.release_player();
        self.focus.release();
        self.position_ms = 0;
        self.error = None;
        self.transition(PlaybackState::Stopped);
    }

    /// Advance the queue and load the item under the new cursor
    ///
    /// An item without audio only moves the cursor: the loaded stream keeps
    /// playing and the snapshot still names it until a playable item loads.
    pub fn skip_next(&mut self) -> Result<()> {
        if self.queue.advance().is_none() {
            debug!("Skip next with empty queue");
            return Ok(());
        }
        self.load_current()
    }

    /// Restart the current item past the threshold, otherwise step back
    pub fn skip_previous(&mut self) -> Result<()> {
        let position = self.current_position();
        match self.queue.retreat(position, self.config.restart_threshold_ms) {
            Some(Retreat::Restart) => {
                if let Some(player) = self.player.as_mut() {
                    player.seek(0);
                }
                self.position_ms = 0;
                self.transition(self.state);
                Ok(())
            }
            Some(Retreat::MoveTo(_)) => self.load_current(),
            None => {
                debug!("Skip previous with empty queue");
                Ok(())
            }
        }
    }

    /// Reposition the loaded stream, keeping play/pause
    pub fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        if !self.prepared {
            return Err(PlaybackError::NoStreamLoaded);
        }
        let player = self.player.as_mut().ok_or(PlaybackError::NoStreamLoaded)?;
        player.seek(position_ms);
        let state = if player.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        self.transition(state);
        Ok(())
    }

    /// Release everything ahead of teardown
    pub fn shutdown(&mut self) {
        self.release_player();
        self.focus.release();
        self.queue = PlayQueue::new();
        self.position_ms = 0;
        self.metadata = None;
        self.error = None;
        self.transition(PlaybackState::Stopped);
        info!("Playback controller shut down");
    }

    // ===== Host Callbacks =====

    fn on_prepared(&mut self) {
        self.prepared = true;
        self.request_focus();
        if let Some(player) = self.player.as_mut() {
            player.start();
        }
        self.transition(PlaybackState::Playing);
    }

    fn on_completed(&mut self) -> Result<()> {
        if self.queue.advance().is_none() {
            self.transition(PlaybackState::Stopped);
            return Ok(());
        }

        match self.load_current() {
            Err(PlaybackError::Unplayable(id)) => {
                debug!(id = %id, "Next item has no audio, stopping");
                self.release_player();
                self.focus.release();
                self.position_ms = 0;
                self.transition(PlaybackState::Stopped);
                Ok(())
            }
            other => other,
        }
    }

    fn on_load_error(&mut self, code: i32, detail: String) {
        self.release_player();
        self.fail(PlaybackError::load_failure(code, detail));
    }

    fn on_focus_lost(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!(state = ?self.state, "Focus lost while not playing");
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.pause();
        }
        info!("Audio focus lost, pausing");
        self.transition(PlaybackState::Paused);
    }

    // ===== Internal =====

    /// Load the item under the cursor into a fresh player
    fn load_current(&mut self) -> Result<()> {
        let item = self
            .queue
            .current()
            .cloned()
            .ok_or(PlaybackError::NoStreamLoaded)?;
        let url = item
            .audio_url
            .clone()
            .ok_or_else(|| PlaybackError::Unplayable(item.id.clone()))?;

        self.release_player();
        self.position_ms = 0;
        self.error = None;
        self.metadata = Some(self.now_playing(&item));

        let mut player = self.factory.create();
        let callbacks = StreamCallbacks::new(self.generation, self.events.clone());

        match player.load(&url, callbacks) {
            Ok(()) => {
                info!(
                    id = %item.id,
                    url = %url,
                    generation = self.generation,
                    "Loading stream"
                );
                self.player = Some(player);
                self.transition(PlaybackState::Buffering);
            }
            Err(e) => self.fail(e),
        }
        Ok(())
    }

    /// Stop and drop the current player; its callbacks become stale
    fn release_player(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.stop();
        }
        self.prepared = false;
        self.generation += 1;
    }

    fn request_focus(&mut self) {
        let listener = FocusListener::new(self.events.clone());
        if !self.focus.request(listener) {
            warn!(error = %PlaybackError::FocusDenied, "Playing without audio focus");
        }
    }

    fn fail(&mut self, error: PlaybackError) {
        warn!(error = %error, "Stream failed");
        self.prepared = false;
        self.position_ms = 0;
        self.error = Some(error.to_string());
        self.transition(PlaybackState::Error);
    }

    fn now_playing(&self, item: &CatalogItem) -> NowPlaying {
        NowPlaying {
            title: item.title.clone(),
            subtitle: item.artist_or_show_name.clone(),
            album: self.config.album_label.clone(),
            artwork_url: item.artwork_url.clone(),
        }
    }

    fn current_position(&self) -> u64 {
        self.player
            .as_ref()
            .map_or(self.position_ms, |p| p.position_ms())
    }

    fn transition(&mut self, state: PlaybackState) {
        self.state = state;
        self.position_ms = self.current_position();
        self.emit_snapshot();
    }

    fn emit_snapshot(&mut self) {
        let snapshot = PlaybackSnapshot {
            state: self.state,
            position_ms: self.position_ms,
            metadata: self.metadata.clone(),
            error: self.error.clone(),
            actions: TransportAction::ALL.to_vec(),
        };
        self.snapshot = snapshot.clone();
        self.pending_snapshots.push(snapshot);
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    /// Generation of the current (or last) load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_stream(&self) -> bool {
        self.player.is_some()
    }

    /// Take every snapshot queued since the last call, oldest first
    pub fn drain_snapshots(&mut self) -> Vec<PlaybackSnapshot> {
        std::mem::take(&mut self.pending_snapshots)
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("prepared", &self.prepared)
            .field("queue_len", &self.queue.len())
            .field("cursor", &self.queue.cursor())
            .finish_non_exhaustive()
    }
}
