//! Loose record access
//!
//! Catalog endpoints return loosely-typed JSON objects whose field names drift
//! between records (`audio_url` on one track, `url` or `preview_url` on
//! another). Lookups go through ordered candidate lists resolved by one helper
//! instead of per-type special cases.

use serde_json::{Map, Value};

/// A raw catalog record as delivered by the API
pub type Record = Map<String, Value>;

/// Ordered list of field names; the first non-empty value wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChain(&'static [&'static str]);

/// Streamable audio location of a track or episode
pub const AUDIO_URL: FieldChain = FieldChain::new(&["audio_url", "url", "preview_url"]);

/// Artwork of a track, episode or show
pub const ARTWORK: FieldChain = FieldChain::new(&["cover_art", "artwork"]);

/// Artist portrait
pub const ARTIST_IMAGE: FieldChain = FieldChain::new(&["image", "image_url"]);

/// Key used to address an artist in node ids
pub const ARTIST_KEY: FieldChain = FieldChain::new(&["id", "slug"]);

impl FieldChain {
    /// Create a chain from candidate field names, most preferred first
    pub const fn new(candidates: &'static [&'static str]) -> Self {
        Self(candidates)
    }

    /// Candidate field names in resolution order
    pub fn candidates(&self) -> &'static [&'static str] {
        self.0
    }

    /// Resolve the first candidate present with a non-empty value
    pub fn resolve(&self, record: &Record) -> Option<String> {
        self.0.iter().find_map(|key| field_str(record, key))
    }
}

/// Read a field as a string
///
/// Strings are returned as-is and numbers are rendered, matching how the API
/// mixes numeric and string ids. Missing, null and empty values are `None`.
pub fn field_str(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
