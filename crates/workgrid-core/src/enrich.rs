//! Activity enrichment capability interface
//!
//! An optional analytics subsystem may know how active each worker has been.
//! The core deliberately depends only on this narrow interface, never on
//! that subsystem's internal shape; an adapter implements it where the
//! subsystem lives. Enrichment is display-only and is overlaid onto
//! outward-facing snapshots at read time (see [`crate::Snapshot::with_activity`]),
//! never onto authoritative state.

use crate::WorkerId;

/// Display-only activity data for one worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivitySample {
    /// Relative activity score; the scale is left to the provider
    pub score: f32,
    /// Whether the worker was active recently
    pub recently_active: bool,
}

/// Capability interface onto the optional analytics subsystem
pub trait ActivityLookup {
    /// Look up the activity sample for a worker, if the provider knows it
    fn lookup_activity(&self, worker: WorkerId) -> Option<ActivitySample>;
}
