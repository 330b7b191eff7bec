//! Catalog store
//!
//! Holds the last successfully fetched catalog. Readers take an `Arc`
//! snapshot without locking; writers publish a whole new catalog, so a reader
//! never observes a half-applied refresh.

use ahoy_core::{Artist, Catalog, CatalogItem, PodcastShow};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Read-shared, replace-on-write catalog
#[derive(Debug)]
pub struct CatalogStore {
    current: ArcSwap<Catalog>,
}

impl CatalogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_catalog(Catalog::default())
    }

    /// Create a store pre-populated with a catalog
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// Current catalog snapshot
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.load_full()
    }

    /// Replace the whole catalog
    pub fn replace(&self, catalog: Catalog) {
        self.current.store(Arc::new(catalog));
    }

    /// Replace the track slice, keeping artists and shows
    pub fn replace_tracks(&self, tracks: Vec<CatalogItem>) {
        self.current.rcu(|current| Catalog {
            tracks: tracks.clone(),
            ..Catalog::clone(current)
        });
    }

    /// Replace the artist slice, keeping tracks and shows
    pub fn replace_artists(&self, artists: Vec<Artist>) {
        self.current.rcu(|current| Catalog {
            artists: artists.clone(),
            ..Catalog::clone(current)
        });
    }

    /// Replace the show slice, keeping tracks and artists
    pub fn replace_shows(&self, shows: Vec<PodcastShow>) {
        self.current.rcu(|current| Catalog {
            shows: shows.clone(),
            ..Catalog::clone(current)
        });
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tracks(ids: &[&str]) -> Vec<CatalogItem> {
        let values: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
        Catalog::tracks_from_values(&values, "")
    }

    #[test]
    fn starts_empty() {
        let store = CatalogStore::new();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn slice_replace_keeps_other_slices() {
        let store = CatalogStore::new();
        store.replace_artists(Catalog::artists_from_values(
            &[json!({ "id": "a1", "name": "Dock Street" })],
            "",
        ));
        store.replace_tracks(tracks(&["t1", "t2"]));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.tracks.len(), 2);
        assert_eq!(snapshot.artists.len(), 1);
    }

    #[test]
    fn old_snapshots_survive_replacement() {
        let store = CatalogStore::new();
        store.replace_tracks(tracks(&["t1"]));
        let before = store.snapshot();

        store.replace_tracks(tracks(&["t2", "t3"]));

        assert_eq!(before.tracks[0].id, "t1");
        assert_eq!(store.snapshot().tracks.len(), 2);
    }
}
