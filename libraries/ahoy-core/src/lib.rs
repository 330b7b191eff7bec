//! Ahoy Core
//!
//! Platform-agnostic catalog model for the Ahoy media service.
//!
//! This crate provides the building blocks shared by the catalog and playback
//! crates:
//! - **Catalog Types**: `CatalogItem`, `Artist`, `PodcastShow`, `Catalog`
//! - **Node Identifiers**: `NodeId` with a reversible string codec
//! - **Loose Records**: `FieldChain` lookups over raw JSON records
//! - **Error Handling**: `CatalogError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use ahoy_core::{Catalog, NodeId};
//! use serde_json::json;
//!
//! let tracks = Catalog::tracks_from_values(
//!     &[json!({ "id": "1", "title": "Harbour Lights", "audio_url": "/a/1.mp3" })],
//!     "https://app.ahoy.ooo",
//! );
//! assert_eq!(tracks[0].audio_url.as_deref(), Some("https://app.ahoy.ooo/a/1.mp3"));
//!
//! let id: NodeId = "track:1".parse().unwrap();
//! assert_eq!(id, NodeId::track("1"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, Result};
pub use types::{
    field_str, parse_records, resolve_media_url, Artist, Catalog, CatalogItem, FieldChain, NodeId,
    PodcastShow, Record, ARTIST_IMAGE, ARTIST_KEY, ARTWORK, AUDIO_URL,
};
