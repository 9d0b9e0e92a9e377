//! Workgrid Core - Authoritative model and snapshot projection
//!
//! This crate provides the data layer of the workgrid replication pipeline:
//! - Identity newtypes for workers, groups, and task categories
//! - The `Delta` vocabulary describing individual host-side mutations
//! - `RawCapture`, a full point-in-time read of simulation state
//! - The worker-owned authoritative `Model` with incremental delta application
//! - Pure builder functions projecting captures into models and models into
//!   immutable `Snapshot`s
//! - The `ActivityLookup` capability interface for display-only enrichment
//!
//! Everything here is pure data and pure functions; threads, queues, and
//! publication live in `workgrid-sync`.

mod builder;
mod capture;
mod delta;
mod enrich;
mod error;
mod identity;
mod model;
mod snapshot;

pub use builder::{build_model, build_snapshot};
pub use capture::{RawCapture, RawCategory, RawCell, RawGroup, RawWorker};
pub use delta::Delta;
pub use enrich::{ActivityLookup, ActivitySample};
pub use error::{Error, Result};
pub use identity::{CategoryId, GroupId, WorkerId};
pub use model::{ApplyOutcome, Category, Cell, Group, Model, Worker};
pub use snapshot::{Snapshot, SnapshotCategory, SnapshotCell, SnapshotGroup, SnapshotWorker};

/// Highest priority rank a client may request (1 is most urgent, 0 disables).
pub const MAX_PRIORITY: i32 = 4;
