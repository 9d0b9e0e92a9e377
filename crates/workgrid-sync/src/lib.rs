//! Workgrid Sync - the replication pipeline between host and readers
//!
//! This crate provides the coordination layer that keeps a worker-owned
//! replica of simulation state in sync with the owning thread and publishes
//! immutable snapshots for reader threads:
//!
//! ```text
//! owning thread                worker thread              reader threads
//!  ├─ DeltaQueue ───────────────▶ drain                      │
//!  ├─ CaptureMailbox ───────────▶ take/build                 │
//!  └─ WakeSignal ───────────────▶ run_cycle ─▶ publish ──▶ SnapshotPublisher
//! ```
//!
//! ## Key components
//!
//! - [`DeltaQueue`]: thread-safe FIFO buffer of mutation deltas
//! - [`CaptureMailbox`]: single-slot handoff for full captures
//! - [`SnapshotPublisher`]: wait-free latest-snapshot handoff with a
//!   monotonic revision
//! - [`Reconciler`] / [`ReplicationWorker`]: the background state machine
//!   that applies deltas incrementally or rebuilds from captures
//! - [`Hub`]: top-level coordinator owning all of the above as instances
//! - [`SimulationHost`] / [`HostDispatcher`]: the owning-thread contracts
//!
//! ## Design principles
//!
//! 1. **Authoritative simulation state is never touched off the owning
//!    thread** - the worker only ever sees deltas and captures
//! 2. **The model is never shared** - all mutation is serialized through the
//!    worker thread, so the model itself needs no locks
//! 3. **No process-wide singletons** - queue and publisher are Hub fields

mod error;
mod host;
mod hub;
mod mailbox;
mod publisher;
mod queue;
mod wake;
mod worker;

pub use error::{Error, Result};
pub use host::{HostDispatcher, HostJob, SimulationHost};
pub use hub::Hub;
pub use mailbox::CaptureMailbox;
pub use publisher::SnapshotPublisher;
pub use queue::DeltaQueue;
pub use wake::WakeSignal;
pub use worker::{CycleOutcome, Reconciler, ReplicationWorker, Shared};
