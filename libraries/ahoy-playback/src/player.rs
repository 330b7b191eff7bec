//! Host audio capabilities
//!
//! The controller never decodes or outputs audio itself. It drives an opaque
//! player provided by the host and arbitrates output through the host's focus
//! mechanism. Both report back asynchronously through handles that turn every
//! callback into a [`ControllerEvent`], so callbacks can fire from any thread.

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::error::Result;
use crate::events::ControllerEvent;

/// Opaque single-stream audio player
///
/// Implementors wrap whatever the host uses to play a URL. After `load` the
/// player prepares asynchronously and reports through the given
/// [`StreamCallbacks`]: `prepared` once it can start, `completed` at the end of
/// the stream, `error` if loading or decoding fails.
pub trait AudioPlayer: Send {
    /// Begin preparing `url`
    ///
    /// # Returns
    /// * `Ok(())` - Preparation started; a callback follows
    /// * `Err(_)` - Synchronous rejection (bad URL, unsupported scheme, etc.)
    fn load(&mut self, url: &str, callbacks: StreamCallbacks) -> Result<()>;

    /// Start or resume output
    fn start(&mut self);

    fn pause(&mut self);

    /// Stop output and release the stream; the handle is dropped afterwards
    fn stop(&mut self);

    /// Reposition within the stream
    fn seek(&mut self, position_ms: u64);

    /// Current playback position
    fn position_ms(&self) -> u64;

    fn is_playing(&self) -> bool;
}

/// Creates a fresh player for every load
pub trait PlayerFactory: Send {
    fn create(&mut self) -> Box<dyn AudioPlayer>;
}

/// Host focus arbitration
pub trait AudioFocus: Send {
    /// Ask for output focus
    ///
    /// Returns `false` when the host denies it. Loss of a granted focus is
    /// reported through `listener`.
    fn request(&mut self, listener: FocusListener) -> bool;

    /// Give focus back
    fn release(&mut self);
}

/// Callback handle for one stream load
///
/// Carries the load generation it was issued for; callbacks from a superseded
/// load arrive with an old generation and are dropped by the controller.
#[derive(Debug, Clone)]
pub struct StreamCallbacks {
    generation: u64,
    events: UnboundedSender<ControllerEvent>,
}

impl StreamCallbacks {
    pub(crate) fn new(generation: u64, events: UnboundedSender<ControllerEvent>) -> Self {
        Self { generation, events }
    }

    /// Load generation this handle belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stream is ready to start
    pub fn prepared(&self) {
        self.send(ControllerEvent::Prepared {
            generation: self.generation,
        });
    }

    /// Stream played to its end
    pub fn completed(&self) {
        self.send(ControllerEvent::Completed {
            generation: self.generation,
        });
    }

    /// Stream failed to load or decode
    pub fn error(&self, code: i32, detail: impl Into<String>) {
        self.send(ControllerEvent::LoadError {
            generation: self.generation,
            code,
            detail: detail.into(),
        });
    }

    fn send(&self, event: ControllerEvent) {
        if self.events.send(event).is_err() {
            trace!(generation = self.generation, "Stream callback after shutdown");
        }
    }
}

/// Callback handle for focus loss
#[derive(Debug, Clone)]
pub struct FocusListener {
    events: UnboundedSender<ControllerEvent>,
}

impl FocusListener {
    pub(crate) fn new(events: UnboundedSender<ControllerEvent>) -> Self {
        Self { events }
    }

    /// Another host client took output focus
    pub fn lost(&self) {
        if self.events.send(ControllerEvent::FocusLost).is_err() {
            trace!("Focus loss after shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn callbacks_carry_their_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let callbacks = StreamCallbacks::new(7, tx);

        callbacks.prepared();
        callbacks.error(-38, "decoder");

        assert_eq!(rx.try_recv().unwrap(), ControllerEvent::Prepared { generation: 7 });
        assert_eq!(
            rx.try_recv().unwrap(),
            ControllerEvent::LoadError {
                generation: 7,
                code: -38,
                detail: "decoder".into()
            }
        );
    }

    #[test]
    fn callbacks_after_receiver_dropped_are_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        StreamCallbacks::new(1, tx.clone()).completed();
        FocusListener::new(tx).lost();
    }
}
