//! Catalog types
//!
//! Typed views over the loosely-typed records returned by the catalog API.
//! Records are interpreted once at ingestion; a record that cannot be
//! interpreted is reported as [`CatalogError::MalformedRecord`] and skipped by
//! [`parse_records`] without affecting its neighbours.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::record::{field_str, Record, ARTIST_IMAGE, ARTIST_KEY, ARTWORK, AUDIO_URL};
use crate::error::{CatalogError, Result};

/// A playable catalog entry: a music track or a podcast episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// Track artist, or the show title for episodes queued from a show
    pub artist_or_show_name: String,
    pub artwork_url: Option<String>,
    /// `None` when the record carries no usable audio location
    pub audio_url: Option<String>,
    /// Artist reference keys some track records carry
    pub artist_id: Option<String>,
    pub artist_slug: Option<String>,
}

impl CatalogItem {
    /// Interpret a track or episode record
    pub fn from_record(kind: &'static str, value: &Value) -> Result<Self> {
        let record = as_record(kind, value)?;
        let id = field_str(record, "id").ok_or_else(|| CatalogError::malformed(kind, "missing id"))?;

        Ok(Self {
            id,
            title: field_str(record, "title").unwrap_or_default(),
            artist_or_show_name: field_str(record, "artist").unwrap_or_default(),
            artwork_url: ARTWORK.resolve(record),
            audio_url: AUDIO_URL.resolve(record),
            artist_id: field_str(record, "artist_id"),
            artist_slug: field_str(record, "artist_slug"),
        })
    }

    /// Whether the item has an audio location to stream from
    pub fn is_playable(&self) -> bool {
        self.audio_url.is_some()
    }

    fn resolve_urls(&mut self, base_url: &str) {
        resolve_in_place(&mut self.artwork_url, base_url);
        resolve_in_place(&mut self.audio_url, base_url);
    }
}

/// An artist entry of the browse tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Node key: the id, or the slug when the record has no id
    pub key: String,
    pub id: Option<String>,
    pub slug: Option<String>,
    pub name: String,
    pub image_url: Option<String>,
    /// Free-form `type` field (band, solo, label...)
    pub kind: Option<String>,
}

impl Artist {
    /// Interpret an artist record
    pub fn from_record(value: &Value) -> Result<Self> {
        let record = as_record("artist", value)?;
        let key = ARTIST_KEY
            .resolve(record)
            .ok_or_else(|| CatalogError::malformed("artist", "missing id and slug"))?;

        Ok(Self {
            key,
            id: field_str(record, "id"),
            slug: field_str(record, "slug"),
            name: field_str(record, "name").unwrap_or_default(),
            image_url: ARTIST_IMAGE.resolve(record),
            kind: field_str(record, "type"),
        })
    }

    /// Whether `key` addresses this artist by id or by slug
    pub fn matches_id(&self, key: &str) -> bool {
        self.id.as_deref() == Some(key)
    }

    pub fn matches_slug(&self, key: &str) -> bool {
        self.slug.as_deref() == Some(key)
    }
}

/// A podcast show with its episodes in publication order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastShow {
    pub slug: String,
    pub title: String,
    pub artwork_url: Option<String>,
    pub episodes: Vec<CatalogItem>,
}

impl PodcastShow {
    /// Interpret a show record
    ///
    /// Individual malformed episodes are skipped with a warning; the show
    /// itself is only rejected when it has no slug to address it by.
    pub fn from_record(value: &Value) -> Result<Self> {
        let record = as_record("show", value)?;
        let slug =
            field_str(record, "slug").ok_or_else(|| CatalogError::malformed("show", "missing slug"))?;

        let episodes = match record.get("episodes") {
            Some(Value::Array(entries)) => {
                parse_records(entries, |entry| CatalogItem::from_record("episode", entry))
            }
            _ => Vec::new(),
        };

        Ok(Self {
            slug,
            title: field_str(record, "title").unwrap_or_default(),
            artwork_url: ARTWORK.resolve(record),
            episodes,
        })
    }

    /// Position of an episode within the show
    pub fn episode_index(&self, episode_id: &str) -> Option<usize> {
        self.episodes.iter().position(|e| e.id == episode_id)
    }
}

/// Snapshot of everything fetched from the catalog API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub tracks: Vec<CatalogItem>,
    pub artists: Vec<Artist>,
    pub shows: Vec<PodcastShow>,
}

impl Catalog {
    /// Create a catalog from already-interpreted slices
    pub fn new(tracks: Vec<CatalogItem>, artists: Vec<Artist>, shows: Vec<PodcastShow>) -> Self {
        Self {
            tracks,
            artists,
            shows,
        }
    }

    /// True until the first successful refresh populates a slice
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.artists.is_empty() && self.shows.is_empty()
    }

    /// Interpret raw track records
    pub fn tracks_from_values(values: &[Value], base_url: &str) -> Vec<CatalogItem> {
        let mut tracks = parse_records(values, |v| CatalogItem::from_record("track", v));
        for track in &mut tracks {
            track.resolve_urls(base_url);
        }
        tracks
    }

    /// Interpret raw artist records
    pub fn artists_from_values(values: &[Value], base_url: &str) -> Vec<Artist> {
        let mut artists = parse_records(values, Artist::from_record);
        for artist in &mut artists {
            resolve_in_place(&mut artist.image_url, base_url);
        }
        artists
    }

    /// Interpret raw show records
    pub fn shows_from_values(values: &[Value], base_url: &str) -> Vec<PodcastShow> {
        let mut shows = parse_records(values, PodcastShow::from_record);
        for show in &mut shows {
            resolve_in_place(&mut show.artwork_url, base_url);
            for episode in &mut show.episodes {
                episode.resolve_urls(base_url);
            }
        }
        shows
    }

    pub fn track(&self, id: &str) -> Option<&CatalogItem> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn show(&self, slug: &str) -> Option<&PodcastShow> {
        self.shows.iter().find(|s| s.slug == slug)
    }

    /// Find the show owning an episode, with the episode's index in it
    pub fn episode(&self, episode_id: &str) -> Option<(&PodcastShow, usize)> {
        self.shows
            .iter()
            .find_map(|show| show.episode_index(episode_id).map(|index| (show, index)))
    }
}

/// Interpret a list of records, skipping the ones that fail
pub fn parse_records<T>(values: &[Value], parse: impl Fn(&Value) -> Result<T>) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(index, error = %e, "Skipping catalog record");
                None
            }
        })
        .collect()
}

/// Resolve a server-relative media URL (`/media/a.mp3`) against the API base
pub fn resolve_media_url(base_url: &str, url: &str) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{}{}", base_url.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

fn resolve_in_place(url: &mut Option<String>, base_url: &str) {
    if let Some(u) = url.as_mut() {
        *u = resolve_media_url(base_url, u);
    }
}

fn as_record<'a>(kind: &'static str, value: &'a Value) -> Result<&'a Record> {
    value
        .as_object()
        .ok_or_else(|| CatalogError::malformed(kind, "expected a JSON object"))
}
