//! Wait-free latest-snapshot handoff with a monotonic revision
//!
//! Single writer (the replication worker), many readers (HTTP handler
//! tasks). Readers never take a lock on the polling path: the latest
//! snapshot lives behind an `ArcSwapOption`, so a read is one atomic load
//! plus a reference-count bump, and once handed out a snapshot is immutable
//! by construction.

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use workgrid_core::Snapshot;

/// Holds the latest published snapshot and assigns revisions
///
/// The revision a reader observes is always the one stored inside the
/// snapshot it loaded, so revision and state can never tear: an unchanged
/// revision is a hard guarantee of an unchanged state.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    latest: ArcSwapOption<Snapshot>,
    next_revision: AtomicU64,
}

impl SnapshotPublisher {
    /// Create a publisher with nothing published yet
    pub fn new() -> Self {
        Self {
            latest: ArcSwapOption::new(None),
            next_revision: AtomicU64::new(0),
        }
    }

    /// Assign the next revision and atomically replace the latest snapshot
    ///
    /// Revisions increase strictly with every publish; none is reused.
    /// Returns the assigned revision.
    pub fn publish(&self, mut snapshot: Snapshot) -> u64 {
        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed) + 1;
        snapshot.revision = revision;
        self.latest.store(Some(Arc::new(snapshot)));
        revision
    }

    /// Load the latest published snapshot, if any
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.load_full()
    }

    /// Revision of the latest published snapshot (0 before the first publish)
    pub fn revision(&self) -> u64 {
        self.latest
            .load()
            .as_ref()
            .map(|snapshot| snapshot.revision)
            .unwrap_or(0)
    }
}
