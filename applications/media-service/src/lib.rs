//! Ahoy Media Service Library
//!
//! Headless runner for the Ahoy catalog browser and player: configuration,
//! simulated audio output, and the text rendering used by the CLI.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod output;

use ahoy_catalog::{BrowseNode, CatalogClient, CatalogStore, NodeKind};
use ahoy_core::NodeId;
use ahoy_playback::PlaybackSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

// Re-export commonly used types for convenience
pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use output::{HeadlessFocus, SimulatedOutput, SimulatedPlayer};

/// Refresh the catalog every `interval`, forever
///
/// The first refresh happens one interval after the call; startup refresh is
/// the caller's job.
pub fn spawn_refresh_loop(
    client: CatalogClient,
    store: Arc<CatalogStore>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        loop {
            ticker.tick().await;
            let summary = client.refresh(&store).await;
            if !summary.is_complete() {
                tracing::warn!(?summary, "Periodic catalog refresh incomplete");
            }
        }
    })
}

/// Decode a node id given on the command line
pub fn parse_node(id: &str) -> Result<NodeId> {
    Ok(NodeId::decode(id.trim())?)
}

/// One line per browse node: id, kind, title, subtitle
pub fn render_node(node: &BrowseNode) -> String {
    let kind = match node.kind {
        NodeKind::Browsable => "+",
        NodeKind::Playable => ">",
    };
    if node.subtitle.is_empty() {
        format!("{} {}  {}", kind, node.id, node.title)
    } else {
        format!("{} {}  {} - {}", kind, node.id, node.title, node.subtitle)
    }
}

/// One line per snapshot: state, position and what is loaded
pub fn render_snapshot(snapshot: &PlaybackSnapshot) -> String {
    let seconds = snapshot.position_ms / 1000;
    let position = format!("{}:{:02}", seconds / 60, seconds % 60);

    let mut line = format!("[{:?}] {}", snapshot.state, position);
    if let Some(metadata) = &snapshot.metadata {
        line.push_str(&format!("  {} - {}", metadata.title, metadata.subtitle));
    }
    if let Some(error) = &snapshot.error {
        line.push_str(&format!("  ({})", error));
    }
    line
}
