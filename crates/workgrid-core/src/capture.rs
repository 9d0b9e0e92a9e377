//! Raw captures - full point-in-time reads of simulation state
//!
//! A `RawCapture` is produced synchronously by the owning thread walking live
//! simulation state, and is consumed once by the replication worker to
//! (re)build the authoritative model. It must never be constructed off the
//! owning thread.

use crate::{CategoryId, GroupId, WorkerId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A complete capture of the priority grid as of one moment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCapture {
    /// Manual assignment mode flag at capture time
    pub manual_priorities: bool,
    /// Task categories in canonical column order
    pub categories: Vec<RawCategory>,
    /// Groups with their workers
    pub groups: Vec<RawGroup>,
}

impl RawCapture {
    /// Create an empty capture with the given mode flag
    pub fn new(manual_priorities: bool) -> Self {
        Self {
            manual_priorities,
            categories: Vec::new(),
            groups: Vec::new(),
        }
    }
}

/// One task category as captured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCategory {
    /// Stable string id
    pub id: CategoryId,
    /// Display label
    pub label: String,
    /// Abbreviated column header label
    pub short_label: String,
}

impl RawCategory {
    /// Create a category record
    pub fn new(
        id: impl Into<CategoryId>,
        label: impl Into<String>,
        short_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            short_label: short_label.into(),
        }
    }
}

/// One group of workers as captured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGroup {
    /// Stable integer id
    pub id: GroupId,
    /// Display label
    pub label: String,
    /// Workers in display order
    pub workers: Vec<RawWorker>,
}

impl RawGroup {
    /// Create an empty group record
    pub fn new(id: GroupId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            workers: Vec::new(),
        }
    }
}

/// One worker as captured
///
/// Cells are keyed by category id; the capture is trusted to reference only
/// known categories, but the builder tolerates unknown keys by dropping them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWorker {
    /// Stable integer id
    pub id: WorkerId,
    /// Display name
    pub name: String,
    /// Per-category cell values
    pub cells: IndexMap<CategoryId, RawCell>,
}

impl RawWorker {
    /// Create a worker record with no cells
    pub fn new(id: WorkerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cells: IndexMap::new(),
        }
    }
}

/// One captured cell value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    /// Priority (0 disabled, 1..4 ranked)
    pub priority: i32,
    /// Skill level, when the category has a relevant skill
    pub skill_level: Option<i32>,
    /// Passion tier, when the category has a relevant skill
    pub passion: Option<i32>,
    /// Whether the worker's policy opposes this category
    pub ideology_opposed: bool,
    /// False when the worker can never perform this category
    pub available: bool,
}

impl RawCell {
    /// An available cell with the given priority and no skill data
    pub fn with_priority(priority: i32) -> Self {
        Self {
            priority,
            skill_level: None,
            passion: None,
            ideology_opposed: false,
            available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_construction() {
        let mut capture = RawCapture::new(true);
        capture
            .categories
            .push(RawCategory::new("Cooking", "Cooking", "Cook"));

        let mut group = RawGroup::new(GroupId::new(1), "Base");
        let mut worker = RawWorker::new(WorkerId::new(7), "Ada");
        worker
            .cells
            .insert(CategoryId::new("Cooking"), RawCell::with_priority(2));
        group.workers.push(worker);
        capture.groups.push(group);

        assert!(capture.manual_priorities);
        assert_eq!(capture.categories.len(), 1);
        assert_eq!(capture.groups[0].workers[0].cells.len(), 1);
    }

    #[test]
    fn test_raw_cell_defaults() {
        let cell = RawCell::with_priority(3);
        assert!(cell.available);
        assert_eq!(cell.skill_level, None);
        assert_eq!(cell.passion, None);
    }
}
