//! Play queue
//!
//! Ordered items plus a cursor. A queue is derived from the context an item
//! was played from (the whole track list, or the episodes of one show) and
//! replaced as a whole on the next play request.

use ahoy_core::{Catalog, CatalogItem, NodeId};

use crate::error::{PlaybackError, Result};

/// Outcome of a skip-previous request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Restart the current item from zero; cursor unchanged
    Restart,
    /// Cursor moved to this index
    MoveTo(usize),
}

/// Ordered play queue with a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayQueue {
    items: Vec<CatalogItem>,
    /// `None` while empty
    cursor: Option<usize>,
}

impl PlayQueue {
    /// Create empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue positioned at `cursor` (clamped into range)
    pub fn with_items(items: Vec<CatalogItem>, cursor: usize) -> Self {
        let cursor = if items.is_empty() {
            None
        } else {
            Some(cursor.min(items.len() - 1))
        };
        Self { items, cursor }
    }

    /// Build the queue for playing `node` out of `catalog`
    ///
    /// - Track: every track in catalog order, cursor on the selected one.
    /// - Episode: the owning show's episodes, each displayed under the show
    ///   title and falling back to the show artwork.
    pub fn start_queue(catalog: &Catalog, node: &NodeId) -> Result<Self> {
        match node {
            NodeId::Track(id) => {
                let index = catalog
                    .tracks
                    .iter()
                    .position(|t| &t.id == id)
                    .ok_or_else(|| PlaybackError::NotFound(node.encode()))?;
                Ok(Self::with_items(catalog.tracks.clone(), index))
            }
            NodeId::Episode(id) => {
                let (show, index) = catalog
                    .episode(id)
                    .ok_or_else(|| PlaybackError::NotFound(node.encode()))?;

                let items = show
                    .episodes
                    .iter()
                    .map(|episode| {
                        let mut item = episode.clone();
                        item.artist_or_show_name.clone_from(&show.title);
                        if item.artwork_url.is_none() {
                            item.artwork_url.clone_from(&show.artwork_url);
                        }
                        item
                    })
                    .collect();

                Ok(Self::with_items(items, index))
            }
            _ => Err(PlaybackError::NotFound(node.encode())),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&CatalogItem> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    /// Move to the next item, wrapping to the start
    ///
    /// Returns the new cursor, or `None` for an empty queue.
    pub fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let next = self.cursor.map_or(0, |c| (c + 1) % self.items.len());
        self.cursor = Some(next);
        Some(next)
    }

    /// Move to the previous item, or ask for a restart
    ///
    /// Past `restart_threshold_ms` into the current item the cursor stays put
    /// and the caller should seek back to zero. Otherwise the cursor steps
    /// back, wrapping from the first item to the last.
    pub fn retreat(&mut self, position_ms: u64, restart_threshold_ms: u64) -> Option<Retreat> {
        if self.items.is_empty() {
            return None;
        }
        if position_ms > restart_threshold_ms {
            return Some(Retreat::Restart);
        }

        let previous = match self.cursor {
            Some(0) | None => self.items.len() - 1,
            Some(c) => c - 1,
        };
        self.cursor = Some(previous);
        Some(Retreat::MoveTo(previous))
    }
}
