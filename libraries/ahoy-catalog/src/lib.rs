//! Ahoy Catalog
//!
//! Fetches the remote catalog, keeps the last good copy, and exposes it as a
//! browse tree.
//!
//! # Features
//!
//! - **Fetch**: tracks, artists and podcast shows from the catalog API
//! - **Store**: lock-free snapshots, replaced slice by slice on refresh
//! - **Browse**: pure tree builder over a catalog snapshot
//!
//! # Example
//!
//! ```ignore
//! use ahoy_catalog::{browse, CatalogClient, CatalogConfig, CatalogStore};
//! use ahoy_core::NodeId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::default())?;
//!     let store = CatalogStore::new();
//!
//!     client.refresh(&store).await;
//!
//!     for node in browse::children(&store.snapshot(), &NodeId::Music) {
//!         println!("{} - {}", node.title, node.subtitle);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod browse;
mod client;
mod error;
mod store;
mod types;

// Re-export main types
pub use browse::{BrowseNode, NodeKind};
pub use client::CatalogClient;
pub use error::{CatalogClientError, Result};
pub use store::CatalogStore;
pub use types::{CatalogConfig, CatalogSlice, RefreshSummary, DEFAULT_BASE_URL};
