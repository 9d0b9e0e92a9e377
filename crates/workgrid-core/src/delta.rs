//! Delta vocabulary for host-to-worker replication
//!
//! A `Delta` is a minimal description of one mutation of simulation state,
//! produced on the owning thread at the moment of the mutation and consumed
//! exactly once by the replication worker. FIFO order between deltas is
//! load-bearing: a resync marker invalidates everything queued before it is
//! processed, not after.

use crate::{CategoryId, WorkerId};
use serde::{Deserialize, Serialize};

/// One host-side mutation, translated for the replication worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Delta {
    /// A single cell's priority changed
    PriorityChanged {
        /// The worker whose cell changed
        worker: WorkerId,
        /// The task category of the cell
        category: CategoryId,
        /// The new priority value (0 disables)
        priority: i32,
    },
    /// The global manual/automatic assignment mode flipped
    ModeChanged {
        /// True when priorities are manually assigned and user-editable
        manual: bool,
    },
    /// State changed in a way incremental deltas cannot express; the model
    /// must be discarded and rebuilt from a fresh capture
    FullResyncRequired,
}

impl Delta {
    /// Create a priority-change delta
    pub fn priority_changed(
        worker: WorkerId,
        category: impl Into<CategoryId>,
        priority: i32,
    ) -> Self {
        Self::PriorityChanged {
            worker,
            category: category.into(),
            priority,
        }
    }

    /// Create a mode-change delta
    pub fn mode_changed(manual: bool) -> Self {
        Self::ModeChanged { manual }
    }

    /// Whether this delta invalidates the whole model
    pub fn is_resync(&self) -> bool {
        matches!(self, Self::FullResyncRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_changed() {
        let delta = Delta::priority_changed(WorkerId::new(7), "Cooking", 3);
        assert_eq!(
            delta,
            Delta::PriorityChanged {
                worker: WorkerId::new(7),
                category: CategoryId::new("Cooking"),
                priority: 3,
            }
        );
        assert!(!delta.is_resync());
    }

    #[test]
    fn test_resync_marker() {
        assert!(Delta::FullResyncRequired.is_resync());
        assert!(!Delta::mode_changed(true).is_resync());
    }
}
