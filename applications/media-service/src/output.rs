//! Headless audio output
//!
//! Lets the service run without a host platform: the simulated player accepts
//! any http(s) stream, reports it prepared after a short delay and advances a
//! wall-clock position while "playing". No audio is decoded.

use ahoy_playback::{
    AudioFocus, AudioPlayer, FocusListener, PlaybackError, PlayerFactory, Result, StreamCallbacks,
};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Error code reported for URLs the simulated player cannot open
pub const UNSUPPORTED_URL: i32 = -1;

/// Creates [`SimulatedPlayer`]s on the current runtime
#[derive(Debug, Clone)]
pub struct SimulatedOutput {
    runtime: Handle,
    prepare_delay: Duration,
    stream_length: Option<Duration>,
}

impl SimulatedOutput {
    /// Must be called inside a tokio runtime
    pub fn new(prepare_delay: Duration) -> Self {
        Self {
            runtime: Handle::current(),
            prepare_delay,
            stream_length: None,
        }
    }

    /// Report every stream completed after `length` of playback
    pub fn with_stream_length(mut self, length: Duration) -> Self {
        self.stream_length = Some(length);
        self
    }
}

impl PlayerFactory for SimulatedOutput {
    fn create(&mut self) -> Box<dyn AudioPlayer> {
        Box::new(SimulatedPlayer {
            runtime: self.runtime.clone(),
            prepare_delay: self.prepare_delay,
            stream_length: self.stream_length,
            callbacks: None,
            offset_ms: 0,
            started_at: None,
            timer: None,
        })
    }
}

/// Wall-clock stand-in for a host player
#[derive(Debug)]
pub struct SimulatedPlayer {
    runtime: Handle,
    prepare_delay: Duration,
    stream_length: Option<Duration>,
    callbacks: Option<StreamCallbacks>,
    // Position accumulated before the current run
    offset_ms: u64,
    started_at: Option<Instant>,
    // Pending prepare or completion notification
    timer: Option<JoinHandle<()>>,
}

impl SimulatedPlayer {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn schedule_completion(&mut self) {
        self.cancel_timer();
        let (Some(length), Some(callbacks)) = (self.stream_length, self.callbacks.clone()) else {
            return;
        };
        let remaining = length.saturating_sub(Duration::from_millis(self.position_ms()));
        self.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(remaining).await;
            callbacks.completed();
        }));
    }
}

impl AudioPlayer for SimulatedPlayer {
    fn load(&mut self, url: &str, callbacks: StreamCallbacks) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PlaybackError::load_failure(
                UNSUPPORTED_URL,
                format!("Unsupported stream URL: {}", url),
            ));
        }

        debug!(url = %url, generation = callbacks.generation(), "Simulated load");
        self.cancel_timer();
        self.offset_ms = 0;
        self.started_at = None;
        self.callbacks = Some(callbacks.clone());

        let delay = self.prepare_delay;
        self.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callbacks.prepared();
        }));
        Ok(())
    }

    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.schedule_completion();
        }
    }

    fn pause(&mut self) {
        self.offset_ms = self.position_ms();
        self.started_at = None;
        self.cancel_timer();
    }

    fn stop(&mut self) {
        self.cancel_timer();
        self.callbacks = None;
        self.started_at = None;
        self.offset_ms = 0;
    }

    fn seek(&mut self, position_ms: u64) {
        self.offset_ms = position_ms;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
            self.schedule_completion();
        }
    }

    fn position_ms(&self) -> u64 {
        let running = self
            .started_at
            .map_or(0, |started| started.elapsed().as_millis() as u64);
        self.offset_ms + running
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }
}

impl Drop for SimulatedPlayer {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Focus arbiter that always grants and never revokes
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFocus;

impl AudioFocus for HeadlessFocus {
    fn request(&mut self, _listener: FocusListener) -> bool {
        trace!("Audio focus granted");
        true
    }

    fn release(&mut self) {
        trace!("Audio focus released");
    }
}
