//! Media service
//!
//! Owns the [`PlaybackController`] on a dedicated worker task. Transport
//! commands and host callbacks share one unbounded channel into that task, so
//! they are applied strictly in arrival order and never interleave. Snapshots
//! leave through a broadcast channel (every transition, in order) and a watch
//! channel (latest only).

use std::sync::Arc;

use ahoy_catalog::{browse, BrowseNode, CatalogClient, CatalogStore, RefreshSummary};
use ahoy_core::NodeId;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::controller::PlaybackController;
use crate::error::{PlaybackError, Result};
use crate::events::ControllerEvent;
use crate::player::{AudioFocus, PlayerFactory};
use crate::types::{PlaybackConfig, PlaybackSnapshot};

/// Handle to the running playback worker
///
/// Must be created inside a tokio runtime. Dropping the handle stops the
/// worker; [`MediaService::shutdown`] additionally waits for it.
#[derive(Debug)]
pub struct MediaService {
    events: mpsc::UnboundedSender<ControllerEvent>,
    snapshots: broadcast::Sender<PlaybackSnapshot>,
    latest: watch::Receiver<PlaybackSnapshot>,
    catalog: Arc<CatalogStore>,
    client: CatalogClient,
    worker: Option<JoinHandle<()>>,
}

impl MediaService {
    /// Spawn the worker with an idle controller
    pub fn spawn(
        config: PlaybackConfig,
        catalog: Arc<CatalogStore>,
        client: CatalogClient,
        factory: Box<dyn PlayerFactory>,
        focus: Box<dyn AudioFocus>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = broadcast::channel(config.event_capacity.max(1));
        let (latest_tx, latest) = watch::channel(PlaybackSnapshot::idle());

        let controller = PlaybackController::new(
            config,
            Arc::clone(&catalog),
            factory,
            focus,
            events_tx.clone(),
        );

        let worker = tokio::spawn(run_worker(
            controller,
            events_rx,
            snapshots.clone(),
            latest_tx,
        ));

        Self {
            events: events_tx,
            snapshots,
            latest,
            catalog,
            client,
            worker: Some(worker),
        }
    }

    // ===== Transport =====

    /// Play the item behind an encoded node id
    pub fn play_by_id(&self, id: impl Into<String>) -> Result<()> {
        self.send(ControllerEvent::PlayById(id.into()))
    }

    pub fn play(&self) -> Result<()> {
        self.send(ControllerEvent::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(ControllerEvent::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(ControllerEvent::Stop)
    }

    pub fn skip_next(&self) -> Result<()> {
        self.send(ControllerEvent::SkipNext)
    }

    pub fn skip_previous(&self) -> Result<()> {
        self.send(ControllerEvent::SkipPrevious)
    }

    pub fn seek_to(&self, position_ms: u64) -> Result<()> {
        self.send(ControllerEvent::SeekTo { position_ms })
    }

    // ===== Browse =====

    /// Id of the browse root
    pub fn root(&self) -> NodeId {
        browse::root()
    }

    /// Children of a node, computed from the current catalog snapshot
    pub async fn children(&self, node: NodeId) -> Vec<BrowseNode> {
        let catalog = self.catalog.snapshot();
        browse::children(&catalog, &node)
    }

    /// Children of an encoded node id
    pub async fn children_of(&self, id: &str) -> Vec<BrowseNode> {
        let catalog = self.catalog.snapshot();
        browse::children_of(&catalog, id)
    }

    // ===== Observation =====

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.latest.borrow().clone()
    }

    /// Every snapshot published from now on, in transition order
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackSnapshot> {
        self.snapshots.subscribe()
    }

    /// Watch the latest snapshot
    pub fn watch(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.latest.clone()
    }

    // ===== Lifecycle =====

    /// Refresh the catalog in the background
    ///
    /// Playback keeps reading the previous catalog until the new slices land.
    pub fn refresh_catalog(&self) -> JoinHandle<RefreshSummary> {
        let client = self.client.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move { client.refresh(&catalog).await })
    }

    /// Shared catalog store
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Release the player and focus, then wait for the worker to finish
    pub async fn shutdown(mut self) -> Result<()> {
        self.send(ControllerEvent::Shutdown)?;
        if let Some(worker) = self.worker.take() {
            worker.await.map_err(|_| PlaybackError::ServiceClosed)?;
        }
        Ok(())
    }

    fn send(&self, event: ControllerEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| PlaybackError::ServiceClosed)
    }
}

impl Drop for MediaService {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.events.send(ControllerEvent::Shutdown);
        }
    }
}

async fn run_worker(
    mut controller: PlaybackController,
    mut events: mpsc::UnboundedReceiver<ControllerEvent>,
    snapshots: broadcast::Sender<PlaybackSnapshot>,
    latest: watch::Sender<PlaybackSnapshot>,
) {
    info!("Playback worker started");

    while let Some(event) = events.recv().await {
        let shutting_down = event == ControllerEvent::Shutdown;
        debug!(event = ?event, "Applying controller event");

        controller.handle(event);

        for snapshot in controller.drain_snapshots() {
            // No subscribers is fine; the watch still holds the latest
            let _ = snapshots.send(snapshot.clone());
            latest.send_replace(snapshot);
        }

        if shutting_down {
            break;
        }
    }

    info!("Playback worker stopped");
}
