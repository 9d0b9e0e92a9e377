//! Thread-safe FIFO buffer of mutation deltas
//!
//! Producers (the owning thread) append; the worker thread drains. The lock
//! is held only for the append or the take, so neither side ever blocks the
//! other for more than a bounded critical section.

use std::sync::Mutex;
use workgrid_core::Delta;

/// Unbounded FIFO delta buffer shared between the owning and worker threads
///
/// An instance owned by the [`crate::Hub`], never a static.
#[derive(Debug, Default)]
pub struct DeltaQueue {
    inner: Mutex<Vec<Delta>>,
}

impl DeltaQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Append a delta to the tail
    ///
    /// Never blocks beyond the append critical section, never drops, never
    /// reorders relative to the same producer.
    pub fn enqueue(&self, delta: Delta) {
        self.inner.lock().expect("delta queue poisoned").push(delta);
    }

    /// Take every queued delta, in FIFO order, leaving the queue empty
    ///
    /// The read and the clear are one atomic step: a delta enqueued before
    /// this call is always included, and a delta enqueued concurrently lands
    /// entirely in exactly one drain.
    pub fn drain_all(&self) -> Vec<Delta> {
        std::mem::take(&mut *self.inner.lock().expect("delta queue poisoned"))
    }

    /// Number of queued deltas
    pub fn len(&self) -> usize {
        self.inner.lock().expect("delta queue poisoned").len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
