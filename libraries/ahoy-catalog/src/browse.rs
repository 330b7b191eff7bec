//! Browse tree
//!
//! Maps a catalog snapshot onto the hierarchical tree hosts navigate. The
//! tree is recomputed on every query; nothing here is cached or persisted.

use ahoy_core::{Artist, Catalog, CatalogItem, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a node has children or can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Browsable,
    Playable,
}

/// One entry of a browse listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseNode {
    pub id: NodeId,
    pub title: String,
    pub subtitle: String,
    pub artwork_url: Option<String>,
    pub kind: NodeKind,
    /// Stream location for playable nodes; carried along, never displayed
    pub audio_url: Option<String>,
}

impl BrowseNode {
    fn browsable(id: NodeId, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: subtitle.into(),
            artwork_url: None,
            kind: NodeKind::Browsable,
            audio_url: None,
        }
    }

    fn playable(id: NodeId, item: &CatalogItem, subtitle: &str) -> Self {
        Self {
            id,
            title: item.title.clone(),
            subtitle: subtitle.to_string(),
            artwork_url: item.artwork_url.clone(),
            kind: NodeKind::Playable,
            audio_url: item.audio_url.clone(),
        }
    }

    fn with_artwork(mut self, artwork_url: Option<&String>) -> Self {
        self.artwork_url = artwork_url.cloned();
        self
    }

    pub fn is_playable(&self) -> bool {
        self.kind == NodeKind::Playable
    }
}

/// Id of the tree root
pub fn root() -> NodeId {
    NodeId::Root
}

/// Children of `node`, in display order
///
/// Unknown nodes, and nodes whose target is missing from the catalog, have no
/// children.
pub fn children(catalog: &Catalog, node: &NodeId) -> Vec<BrowseNode> {
    match node {
        NodeId::Root => vec![
            BrowseNode::browsable(NodeId::Music, "All Music", "Browse all tracks"),
            BrowseNode::browsable(NodeId::Artists, "Artists", "Browse by artist"),
            BrowseNode::browsable(NodeId::Podcasts, "Podcasts", "Browse podcasts"),
        ],
        NodeId::Music => catalog.tracks.iter().map(track_node).collect(),
        NodeId::Artists => catalog
            .artists
            .iter()
            .map(|artist| {
                BrowseNode::browsable(
                    NodeId::artist(artist.key.clone()),
                    artist.name.clone(),
                    artist.kind.clone().unwrap_or_default(),
                )
                .with_artwork(artist.image_url.as_ref())
            })
            .collect(),
        NodeId::Podcasts => catalog
            .shows
            .iter()
            .map(|show| {
                BrowseNode::browsable(
                    NodeId::podcast(show.slug.clone()),
                    show.title.clone(),
                    format!("{} episodes", show.episodes.len()),
                )
                .with_artwork(show.artwork_url.as_ref())
            })
            .collect(),
        NodeId::Artist(key) => artist_tracks(catalog, key),
        NodeId::Podcast(slug) => match catalog.show(slug) {
            Some(show) => show
                .episodes
                .iter()
                .map(|episode| {
                    let subtitle = if episode.artist_or_show_name.is_empty() {
                        show.title.as_str()
                    } else {
                        episode.artist_or_show_name.as_str()
                    };
                    let mut node =
                        BrowseNode::playable(NodeId::episode(episode.id.clone()), episode, subtitle);
                    if node.artwork_url.is_none() {
                        node.artwork_url.clone_from(&show.artwork_url);
                    }
                    node
                })
                .collect(),
            None => {
                debug!(slug = %slug, "No such podcast show");
                Vec::new()
            }
        },
        NodeId::Track(_) | NodeId::Episode(_) => Vec::new(),
    }
}

/// Children of an encoded node id; undecodable ids have no children
pub fn children_of(catalog: &Catalog, encoded: &str) -> Vec<BrowseNode> {
    match encoded.parse::<NodeId>() {
        Ok(node) => children(catalog, &node),
        Err(e) => {
            debug!(id = %encoded, error = %e, "Unknown browse node");
            Vec::new()
        }
    }
}

fn track_node(track: &CatalogItem) -> BrowseNode {
    BrowseNode::playable(NodeId::track(track.id.clone()), track, &track.artist_or_show_name)
}

/// Display name of the artist addressed by `key`: id match first, then slug
fn resolve_artist<'a>(artists: &'a [Artist], key: &str) -> Option<&'a Artist> {
    artists
        .iter()
        .find(|a| a.matches_id(key))
        .or_else(|| artists.iter().find(|a| a.matches_slug(key)))
}

fn artist_tracks(catalog: &Catalog, key: &str) -> Vec<BrowseNode> {
    let name = resolve_artist(&catalog.artists, key)
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty());

    catalog
        .tracks
        .iter()
        .filter(|track| {
            track.artist_id.as_deref() == Some(key)
                || track.artist_slug.as_deref() == Some(key)
                || name.is_some_and(|name| track.artist_or_show_name == name)
        })
        .map(track_node)
        .collect()
}
