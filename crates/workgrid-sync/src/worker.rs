//! The replication worker: scheduling and reconciliation
//!
//! The worker is the only owner of the authoritative model. It blocks on the
//! wake signal when idle, and each pass either rebuilds the model from a
//! pending capture or drains the delta queue and applies the batch in order.
//! After every successful apply or rebuild it projects and publishes a fresh
//! snapshot.
//!
//! The reconciliation logic lives in [`Reconciler::run_cycle`], a synchronous
//! method with no thread of its own, so the state machine is testable
//! deterministically; [`ReplicationWorker`] is the thin background-thread
//! shell around it.

use crate::{CaptureMailbox, DeltaQueue, SnapshotPublisher, WakeSignal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};
use workgrid_core::{build_model, build_snapshot, ApplyOutcome, Model};

/// The structures shared between the owning, worker, and reader threads
///
/// Owned by the [`crate::Hub`]; the queue and mailbox are the only
/// structures both the owning and worker thread touch directly, and both
/// hold their lock only for bounded critical sections.
#[derive(Debug, Default)]
pub struct Shared {
    /// FIFO buffer of pending deltas
    pub queue: DeltaQueue,
    /// Latest unconsumed full capture
    pub mailbox: CaptureMailbox,
    /// Latest published snapshot + revision
    pub publisher: SnapshotPublisher,
    /// Coalescing wake signal for the worker
    pub wake: WakeSignal,
    stop: AtomicBool,
}

impl Shared {
    /// Create the shared pipeline state
    pub fn new() -> Self {
        Self::default()
    }
}

/// What one worker pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A snapshot was published under the given revision
    Published(u64),
    /// Ready, but the queue was empty; nothing to publish
    Idle,
    /// No model; waiting for a capture (deltas, if any, were discarded)
    AwaitingCapture,
}

/// The worker-side reconciliation state machine
///
/// Two logical states: **Uninitialized** (`model` is `None`; every delta is
/// discarded until a capture arrives) and **Ready** (deltas are applied
/// incrementally). A resync delta or a failed rebuild drops back to
/// Uninitialized; a consumed capture moves to Ready.
#[derive(Debug, Default)]
pub struct Reconciler {
    model: Option<Model>,
}

impl Reconciler {
    /// Start Uninitialized
    pub fn new() -> Self {
        Self { model: None }
    }

    /// Whether a model is present
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Run one worker pass against the shared pipeline state
    ///
    /// Never panics and never lets a failure escape: a malformed capture
    /// logs a warning and leaves the state Uninitialized for the next
    /// capture to retry.
    pub fn run_cycle(&mut self, shared: &Shared) -> CycleOutcome {
        // A pending capture supersedes everything queued no later than it;
        // the host captures atomically with or after enqueuing any delta
        // that changed structural topology.
        if let Some(capture) = shared.mailbox.take() {
            let discarded = shared.queue.drain_all().len();
            if discarded > 0 {
                debug!(discarded, "discarded deltas superseded by capture");
            }
            return match build_model(&capture) {
                Ok(model) => {
                    let snapshot = build_snapshot(&model);
                    self.model = Some(model);
                    let revision = shared.publisher.publish(snapshot);
                    info!(revision, "rebuilt model from capture");
                    CycleOutcome::Published(revision)
                }
                Err(err) => {
                    self.model = None;
                    warn!(error = %err, "capture rebuild failed; awaiting next capture");
                    CycleOutcome::AwaitingCapture
                }
            };
        }

        let Some(mut model) = self.model.take() else {
            let discarded = shared.queue.drain_all().len();
            if discarded > 0 {
                debug!(discarded, "discarded deltas while uninitialized");
            }
            return CycleOutcome::AwaitingCapture;
        };

        let batch = shared.queue.drain_all();
        if batch.is_empty() {
            self.model = Some(model);
            return CycleOutcome::Idle;
        }

        for (index, delta) in batch.iter().enumerate() {
            if model.apply(delta) == ApplyOutcome::Invalidated {
                // Everything after the marker was computed against state
                // that is no longer trustworthy; drop it with the model.
                info!(
                    dropped = batch.len() - index - 1,
                    "model invalidated; awaiting capture"
                );
                return CycleOutcome::AwaitingCapture;
            }
        }

        let snapshot = build_snapshot(&model);
        self.model = Some(model);
        let revision = shared.publisher.publish(snapshot);
        debug!(applied = batch.len(), revision, "published snapshot");
        CycleOutcome::Published(revision)
    }
}

/// Background thread driving a [`Reconciler`]
///
/// Runs for the lifetime of its [`crate::Hub`]; it blocks only on the wake
/// signal, never on I/O.
#[derive(Debug)]
pub struct ReplicationWorker {
    thread: JoinHandle<()>,
    shared: Arc<Shared>,
}

impl ReplicationWorker {
    /// Spawn the worker thread
    pub fn spawn(shared: Arc<Shared>) -> std::io::Result<Self> {
        let thread = {
            let shared = Arc::clone(&shared);
            std::thread::Builder::new()
                .name("workgrid-replication".into())
                .spawn(move || {
                    let mut reconciler = Reconciler::new();
                    loop {
                        shared.wake.wait();
                        if shared.stop.load(Ordering::Acquire) {
                            break;
                        }
                        reconciler.run_cycle(&shared);
                    }
                    debug!("replication worker stopped");
                })?
        };
        Ok(Self { thread, shared })
    }

    /// Ask the thread to stop and wait for it
    pub fn shutdown(self) -> crate::Result<()> {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.wake.raise();
        self.thread.join().map_err(|_| crate::Error::WorkerPanicked)
    }
}
