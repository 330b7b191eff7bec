//! Browse tree node identifiers
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

const ROOT: &str = "ROOT";
const MUSIC: &str = "MUSIC";
const ARTISTS: &str = "ARTISTS";
const PODCASTS: &str = "PODCASTS";

const ARTIST_PREFIX: &str = "ARTIST";
const PODCAST_PREFIX: &str = "PODCAST";
const TRACK_PREFIX: &str = "track";
const EPISODE_PREFIX: &str = "episode";

const DELIMITER: char = ':';

/// Identifier of a node in the browse tree
///
/// Encoded as a string for hosts (`ROOT`, `ARTIST:<key>`, `track:<id>` ...).
/// Keys are percent-escaped so the delimiter can never appear raw inside
/// them, which keeps decoding unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NodeId {
    /// Top of the tree
    Root,
    /// Every track in catalog order
    Music,
    /// Every artist
    Artists,
    /// Every podcast show
    Podcasts,
    /// One artist, keyed by id or slug
    Artist(String),
    /// One show, keyed by slug
    Podcast(String),
    /// A playable track
    Track(String),
    /// A playable episode
    Episode(String),
}

impl NodeId {
    /// Node for an artist key
    pub fn artist(key: impl Into<String>) -> Self {
        Self::Artist(key.into())
    }

    /// Node for a show slug
    pub fn podcast(slug: impl Into<String>) -> Self {
        Self::Podcast(slug.into())
    }

    /// Node for a track id
    pub fn track(id: impl Into<String>) -> Self {
        Self::Track(id.into())
    }

    /// Node for an episode id
    pub fn episode(id: impl Into<String>) -> Self {
        Self::Episode(id.into())
    }

    /// Whether the node addresses a single playable item
    pub fn is_playable(&self) -> bool {
        matches!(self, Self::Track(_) | Self::Episode(_))
    }

    /// Encode into the host-facing string form
    pub fn encode(&self) -> String {
        match self {
            Self::Root => ROOT.to_string(),
            Self::Music => MUSIC.to_string(),
            Self::Artists => ARTISTS.to_string(),
            Self::Podcasts => PODCASTS.to_string(),
            Self::Artist(key) => compose(ARTIST_PREFIX, key),
            Self::Podcast(key) => compose(PODCAST_PREFIX, key),
            Self::Track(id) => compose(TRACK_PREFIX, id),
            Self::Episode(id) => compose(EPISODE_PREFIX, id),
        }
    }

    /// Decode the host-facing string form
    pub fn decode(s: &str) -> Result<Self> {
        match s {
            ROOT => return Ok(Self::Root),
            MUSIC => return Ok(Self::Music),
            ARTISTS => return Ok(Self::Artists),
            PODCASTS => return Ok(Self::Podcasts),
            _ => {}
        }

        let (prefix, escaped) = s
            .split_once(DELIMITER)
            .ok_or_else(|| CatalogError::invalid_node_id(s))?;
        let key = urlencoding::decode(escaped)
            .map_err(|_| CatalogError::invalid_node_id(s))?
            .into_owned();

        match prefix {
            ARTIST_PREFIX => Ok(Self::Artist(key)),
            PODCAST_PREFIX => Ok(Self::Podcast(key)),
            TRACK_PREFIX => Ok(Self::Track(key)),
            EPISODE_PREFIX => Ok(Self::Episode(key)),
            _ => Err(CatalogError::invalid_node_id(s)),
        }
    }
}

fn compose(prefix: &str, key: &str) -> String {
    format!("{}{}{}", prefix, DELIMITER, urlencoding::encode(key))
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for NodeId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.encode()
    }
}

impl TryFrom<String> for NodeId {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self> {
        Self::decode(&s)
    }
}
