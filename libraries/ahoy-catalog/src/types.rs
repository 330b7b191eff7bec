//! Types for the catalog API requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default catalog host.
pub const DEFAULT_BASE_URL: &str = "https://app.ahoy.ooo";

/// Configuration for connecting to the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the API (e.g., "https://app.ahoy.ooo")
    pub base_url: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout, including reading the body
    pub request_timeout: Duration,
}

impl CatalogConfig {
    /// Create a config for the given base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// One independently fetched part of the catalog.
///
/// Each slice lives at its own endpoint and wraps its records in a named
/// array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSlice {
    Tracks,
    Artists,
    Shows,
}

impl CatalogSlice {
    /// Endpoint path relative to the base URL
    pub fn path(self) -> &'static str {
        match self {
            CatalogSlice::Tracks => "/api/music",
            CatalogSlice::Artists => "/api/artists",
            CatalogSlice::Shows => "/api/podcasts",
        }
    }

    /// Name of the array field holding the records
    pub fn field(self) -> &'static str {
        match self {
            CatalogSlice::Tracks => "tracks",
            CatalogSlice::Artists => "artists",
            CatalogSlice::Shows => "shows",
        }
    }
}

/// Outcome of a catalog refresh.
///
/// `None` marks a slice whose fetch failed; the store kept its previous
/// contents for that slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub tracks: Option<usize>,
    pub artists: Option<usize>,
    pub shows: Option<usize>,
}

impl RefreshSummary {
    /// Whether every slice was replaced
    pub fn is_complete(&self) -> bool {
        self.tracks.is_some() && self.artists.is_some() && self.shows.is_some()
    }
}
