//! Worker Registry
//!
//! Host-side worker lifecycle: registration spawns a worker task around a
//! fresh [`CacheController`] and immediately makes it the controlling
//! worker for all open pages (no waiting on a previous instance). Pages
//! reach the worker only through its event channel: fire-and-forget
//! messages, connectivity notices, and fetch dispatch with a reply.

use std::sync::{Arc, RwLock};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStorage;
use crate::config::WorkerConfig;
use crate::models::{Connectivity, FetchRequest, WorkerMessage};
use crate::net::Network;
use crate::worker::{CacheController, FetchDecision};

// == Worker Event ==
/// An event delivered to the worker task's queue.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A raw postMessage payload from the page
    Message(serde_json::Value),
    /// An online/offline transition
    Connectivity(Connectivity),
    /// An outbound request awaiting an interception decision
    Fetch {
        request: FetchRequest,
        reply: oneshot::Sender<FetchDecision>,
    },
}

// == Worker Handle ==
/// The page's handle to a registered worker.
///
/// All sends are best-effort: if the worker task is gone, they are
/// silently dropped, matching the fire-and-forget message channel.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    events: mpsc::UnboundedSender<WorkerEvent>,
}

impl WorkerHandle {
    /// Posts a protocol message to the worker.
    pub fn post_message(&self, message: &WorkerMessage) {
        match serde_json::to_value(message) {
            Ok(value) => self.post_raw(value),
            Err(error) => warn!("failed to encode worker message: {error}"),
        }
    }

    /// Posts an arbitrary JSON payload; the worker ignores unknown kinds.
    pub fn post_raw(&self, value: serde_json::Value) {
        if self.events.send(WorkerEvent::Message(value)).is_err() {
            debug!("worker gone, message dropped");
        }
    }

    /// Notifies the worker of an online/offline transition.
    pub fn notify_connectivity(&self, connectivity: Connectivity) {
        if self.events.send(WorkerEvent::Connectivity(connectivity)).is_err() {
            debug!("worker gone, connectivity notice dropped");
        }
    }

    /// Presents an outbound request to the worker and awaits its decision.
    /// A dead worker yields [`FetchDecision::PassThrough`].
    pub async fn fetch(&self, request: FetchRequest) -> FetchDecision {
        let (reply, response) = oneshot::channel();
        if self.events.send(WorkerEvent::Fetch { request, reply }).is_err() {
            return FetchDecision::PassThrough;
        }
        response.await.unwrap_or(FetchDecision::PassThrough)
    }
}

// == Worker Registry ==
/// Owns the currently controlling worker and the resources every worker
/// instance shares: configuration, cache storage, and the network.
///
/// Storage lives here rather than in the worker so that cached content
/// survives a worker restart while the volatile auth state does not.
#[derive(Debug, Clone)]
pub struct WorkerRegistry {
    config: WorkerConfig,
    storage: CacheStorage,
    network: Arc<dyn Network>,
    active: Arc<RwLock<Option<ActiveWorker>>>,
}

#[derive(Debug)]
struct ActiveWorker {
    handle: WorkerHandle,
    task: JoinHandle<()>,
}

impl WorkerRegistry {
    // == Constructor ==
    /// Creates a registry with no worker registered.
    pub fn new(config: WorkerConfig, network: Arc<dyn Network>) -> Self {
        let storage = CacheStorage::new(config.max_entries, config.max_body_bytes);
        Self {
            config,
            storage,
            network,
            active: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the shared cache storage, for inspection.
    pub fn storage(&self) -> CacheStorage {
        self.storage.clone()
    }

    // == Register ==
    /// Installs and activates a new worker, replacing any previous one
    /// immediately: install performs no cache population and skips any
    /// waiting phase, and activation claims all open pages in one step.
    pub fn register(&self) -> WorkerHandle {
        info!("worker installing");
        let controller = CacheController::new(
            self.config.clone(),
            self.storage.clone(),
            Arc::clone(&self.network),
        );

        let (events, queue) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_worker(controller, queue));
        let handle = WorkerHandle { events };

        info!("worker activating");
        let mut slot = self.active.write().expect("registry lock poisoned");
        if let Some(previous) = slot.take() {
            debug!("replacing previous worker");
            previous.task.abort();
        }
        *slot = Some(ActiveWorker {
            handle: handle.clone(),
            task,
        });
        info!("worker claimed all pages");

        handle
    }

    // == Controller ==
    /// Returns the currently controlling worker, if one is registered and
    /// still running.
    pub fn controller(&self) -> Option<WorkerHandle> {
        let slot = self.active.read().expect("registry lock poisoned");
        slot.as_ref()
            .filter(|active| !active.task.is_finished())
            .map(|active| active.handle.clone())
    }

    // == Fetch Dispatch ==
    /// Routes a page-initiated request through the controlling worker.
    /// With no worker registered the request passes through untouched.
    pub async fn dispatch_fetch(&self, request: FetchRequest) -> FetchDecision {
        match self.controller() {
            Some(handle) => handle.fetch(request).await,
            None => FetchDecision::PassThrough,
        }
    }
}

/// The worker's event loop: one event at a time, run to completion.
async fn run_worker(mut controller: CacheController, mut queue: mpsc::UnboundedReceiver<WorkerEvent>) {
    while let Some(event) = queue.recv().await {
        match event {
            WorkerEvent::Message(value) => controller.handle_raw(value).await,
            WorkerEvent::Connectivity(connectivity) => {
                controller.handle_connectivity(connectivity).await
            }
            WorkerEvent::Fetch { request, reply } => {
                let decision = controller.handle_fetch(&request).await;
                // Requesting page may have gone away
                let _ = reply.send(decision);
            }
        }
    }
    debug!("worker event queue closed, stopping");
}
