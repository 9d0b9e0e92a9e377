//! Owning-thread contracts
//!
//! Authoritative simulation state lives on exactly one thread. These traits
//! pin that rule down at the type level: [`SimulationHost`] is the adapter
//! over live simulation state and runs only on the owning thread;
//! [`HostDispatcher`] is how any other thread (the web write path) marshals
//! work onto it.

use crate::Result;
use workgrid_core::{CategoryId, GroupId, RawCapture, WorkerId};

/// A unit of work to execute on the owning thread
pub type HostJob = Box<dyn FnOnce(&mut dyn SimulationHost) + Send + 'static>;

/// Adapter over live simulation state
///
/// Implementations run exclusively on the owning thread. The write path is
/// the only external mutator of authoritative state; a successful write is
/// expected to trigger the ingress notification path itself (enqueue a
/// delta, wake the worker), closing the replication loop.
pub trait SimulationHost {
    /// Walk live state into a full capture
    ///
    /// Called at bootstrap and on explicit resync requests.
    fn capture(&mut self) -> RawCapture;

    /// Apply a priority write against live state
    ///
    /// Rejects unknown entities and writes to unavailable cells. Validation
    /// of the raw client input (priority range, id syntax) happens before
    /// the job is dispatched; this method only guards invariants the live
    /// state knows about.
    fn apply_priority(
        &mut self,
        group: GroupId,
        worker: WorkerId,
        category: &CategoryId,
        priority: i32,
    ) -> Result<()>;
}

/// Marshals jobs onto the owning thread
///
/// The write path returns as soon as the job is handed over; correctness is
/// guaranteed by the polling loop converging on the published state, not by
/// the write's response.
pub trait HostDispatcher: Send + Sync {
    /// Hand a job to the owning thread without blocking on its execution
    fn dispatch(&self, job: HostJob) -> Result<()>;
}
