//! Ahoy - Playback Management
//!
//! Queue and single-stream playback control for the Ahoy media service.
//!
//! This crate provides:
//! - Play queue derived from catalog context (all tracks, or one show's episodes)
//! - Next/previous navigation with wraparound and restart-on-previous
//! - A playback state machine driving an opaque host player
//! - Normalized playback snapshots after every transition
//! - A worker task serializing commands and host callbacks
//!
//! # Architecture
//!
//! `ahoy-playback` never touches audio hardware:
//! - The host supplies an [`AudioPlayer`] per stream via a [`PlayerFactory`]
//! - The host supplies focus arbitration via [`AudioFocus`]
//! - Callbacks come back through [`StreamCallbacks`] and [`FocusListener`]
//!
//! # Example
//!
//! ```rust,no_run
//! use ahoy_catalog::{CatalogClient, CatalogConfig, CatalogStore};
//! use ahoy_playback::{
//!     AudioFocus, AudioPlayer, FocusListener, MediaService, PlaybackConfig, PlayerFactory,
//!     Result, StreamCallbacks,
//! };
//! use std::sync::Arc;
//!
//! struct HostPlayer;
//!
//! impl AudioPlayer for HostPlayer {
//!     fn load(&mut self, _url: &str, callbacks: StreamCallbacks) -> Result<()> {
//!         callbacks.prepared();
//!         Ok(())
//!     }
//!     fn start(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn seek(&mut self, _position_ms: u64) {}
//!     fn position_ms(&self) -> u64 { 0 }
//!     fn is_playing(&self) -> bool { false }
//! }
//!
//! struct HostFactory;
//!
//! impl PlayerFactory for HostFactory {
//!     fn create(&mut self) -> Box<dyn AudioPlayer> {
//!         Box::new(HostPlayer)
//!     }
//! }
//!
//! struct HostFocus;
//!
//! impl AudioFocus for HostFocus {
//!     fn request(&mut self, _listener: FocusListener) -> bool { true }
//!     fn release(&mut self) {}
//! }
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new(CatalogConfig::default())?;
//! let service = MediaService::spawn(
//!     PlaybackConfig::default(),
//!     Arc::new(CatalogStore::new()),
//!     client,
//!     Box::new(HostFactory),
//!     Box::new(HostFocus),
//! );
//!
//! service.refresh_catalog().await?;
//! service.play_by_id("track:1")?;
//! let mut updates = service.subscribe();
//! let snapshot = updates.recv().await?;
//! println!("{:?}", snapshot.state);
//!
//! service.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
pub mod events;
mod player;
mod queue;
mod service;
pub mod types;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::ControllerEvent;
pub use player::{AudioFocus, AudioPlayer, FocusListener, PlayerFactory, StreamCallbacks};
pub use queue::{PlayQueue, Retreat};
pub use service::MediaService;
pub use types::{
    NowPlaying, PlaybackConfig, PlaybackSnapshot, PlaybackState, TransportAction,
    DEFAULT_ALBUM_LABEL,
};
