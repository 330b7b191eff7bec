//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Node id does not resolve to a catalog item
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item has no audio location
    #[error("Item has no playable audio: {0}")]
    Unplayable(String),

    /// Player rejected or failed to load a stream
    #[error("Playback error ({code}): {detail}")]
    LoadFailure { code: i32, detail: String },

    /// Host refused audio focus
    #[error("Audio focus denied")]
    FocusDenied,

    /// No stream is currently loaded
    #[error("No stream loaded")]
    NoStreamLoaded,

    /// The playback worker has shut down
    #[error("Media service is closed")]
    ServiceClosed,
}

impl PlaybackError {
    pub fn load_failure(code: i32, detail: impl Into<String>) -> Self {
        Self::LoadFailure {
            code,
            detail: detail.into(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
