//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Default collection label shown as the album of whatever is playing
pub const DEFAULT_ALBUM_LABEL: &str = "Ahoy Indie Media";

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing requested yet
    Idle,

    /// Stream loading, waiting for the player to be prepared
    Buffering,

    /// Currently playing
    Playing,

    /// Paused mid-item
    Paused,

    /// Output released
    Stopped,

    /// Current item failed to load or decode
    Error,
}

/// Transport actions the controller accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportAction {
    Play,
    Pause,
    SkipToNext,
    SkipToPrevious,
    Stop,
    SeekTo,
    PlayFromId,
}

impl TransportAction {
    /// Every action, in the order hosts list them
    pub const ALL: [TransportAction; 7] = [
        TransportAction::Play,
        TransportAction::Pause,
        TransportAction::SkipToNext,
        TransportAction::SkipToPrevious,
        TransportAction::Stop,
        TransportAction::SeekTo,
        TransportAction::PlayFromId,
    ];
}

/// Display metadata of the loaded item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub title: String,
    /// Artist, or show title for episodes
    pub subtitle: String,
    pub album: String,
    pub artwork_url: Option<String>,
}

/// The single externally observable playback status
///
/// Built whole on every transition; observers never see a state paired with
/// another transition's position or metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub position_ms: u64,
    pub metadata: Option<NowPlaying>,
    /// Message describing why `state` is `Error`
    pub error: Option<String>,
    pub actions: Vec<TransportAction>,
}

impl PlaybackSnapshot {
    pub fn idle() -> Self {
        Self {
            state: PlaybackState::Idle,
            position_ms: 0,
            metadata: None,
            error: None,
            actions: TransportAction::ALL.to_vec(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Skip-previous restarts the current item past this position (default: 3000)
    pub restart_threshold_ms: u64,

    /// Album shown in now-playing metadata (default: "Ahoy Indie Media")
    pub album_label: String,

    /// Snapshots buffered per lagging subscriber (default: 64)
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            restart_threshold_ms: 3000,
            album_label: DEFAULT_ALBUM_LABEL.to_string(),
            event_capacity: 64,
        }
    }
}
