//! Hub - top-level coordinator of the replication pipeline
//!
//! The hub owns the delta queue, capture mailbox, snapshot publisher, and
//! the replication worker as plain instances (no process-wide globals). The
//! owning thread feeds it; reader threads poll it.

use crate::{ReplicationWorker, Shared};
use std::sync::Arc;
use workgrid_core::{Delta, RawCapture, Snapshot};

/// Coordinator owning the queue/publisher pair and the worker thread
///
/// Ingress methods (`notify`, `request_resync`) are meant to be called from
/// the owning thread at the moment a mutation happens; egress methods
/// (`latest_snapshot`, `revision`) are safe from any thread and never block.
///
/// Dropping the hub stops the worker; use [`Hub::shutdown`] to observe a
/// panic it may have died with.
#[derive(Debug)]
pub struct Hub {
    shared: Arc<Shared>,
    worker: Option<ReplicationWorker>,
}

impl Hub {
    /// Create a hub and spawn its replication worker
    pub fn new() -> crate::Result<Self> {
        let shared = Arc::new(Shared::new());
        let worker = ReplicationWorker::spawn(Arc::clone(&shared))?;
        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    // ========================================================================
    // Ingress (owning thread)
    // ========================================================================

    /// Enqueue one mutation delta and wake the worker
    pub fn notify(&self, delta: Delta) {
        self.shared.queue.enqueue(delta);
        self.shared.wake.raise();
    }

    /// Deposit a fresh capture (bootstrap or explicit resync) and wake the
    /// worker
    ///
    /// An unconsumed earlier capture is discarded; it is redundant by
    /// construction.
    pub fn request_resync(&self, capture: RawCapture) {
        self.shared.mailbox.put(capture);
        self.shared.wake.raise();
    }

    // ========================================================================
    // Egress (any thread)
    // ========================================================================

    /// Latest published snapshot, if any
    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.shared.publisher.latest()
    }

    /// Revision of the latest published snapshot (0 before the first)
    pub fn revision(&self) -> u64 {
        self.shared.publisher.revision()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Stop the worker thread and wait for it
    pub fn shutdown(mut self) -> crate::Result<()> {
        match self.worker.take() {
            Some(worker) => worker.shutdown(),
            None => Ok(()),
        }
    }
}

impl Drop for Hub {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.shutdown();
        }
    }
}
