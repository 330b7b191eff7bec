//! Controller Events
//!
//! Everything that can move the playback state machine, whether it comes from
//! a transport command or from a host callback. The worker applies events
//! strictly one at a time.

use serde::{Deserialize, Serialize};

/// Input to [`crate::PlaybackController::handle`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerEvent {
    /// Play the item behind an encoded node id, replacing the queue
    PlayById(String),

    /// Resume a loaded, non-playing stream
    Play,

    Pause,

    /// Release output and focus
    Stop,

    SkipNext,

    /// Restart the current item, or step back one item
    SkipPrevious,

    /// Reposition the loaded stream
    SeekTo {
        /// Target position in milliseconds
        position_ms: u64,
    },

    /// Player finished preparing
    Prepared {
        /// Load generation the callback belongs to
        generation: u64,
    },

    /// Player reached the end of the stream
    Completed {
        /// Load generation the callback belongs to
        generation: u64,
    },

    /// Player failed to load or decode
    LoadError {
        /// Load generation the callback belongs to
        generation: u64,
        /// Host error code
        code: i32,
        /// Host error description
        detail: String,
    },

    /// Host took output focus away
    FocusLost,

    /// Release everything and stop the worker
    Shutdown,
}

impl ControllerEvent {
    /// Whether the event came from a player callback
    pub fn is_stream_callback(&self) -> bool {
        matches!(
            self,
            ControllerEvent::Prepared { .. }
                | ControllerEvent::Completed { .. }
                | ControllerEvent::LoadError { .. }
        )
    }
}
