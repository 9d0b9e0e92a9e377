//! Immutable snapshots - the outward-facing projection of the model
//!
//! A `Snapshot` is fully self-contained: it aliases no storage inside the
//! model it was projected from, so the model can keep mutating while any
//! number of reader threads hold the snapshot. Once published it is never
//! mutated; concurrent unsynchronized reads are safe by construction.
//!
//! The serde shape of these types IS the wire contract for the polling
//! client: camelCase keys, optional skill fields omitted when absent, and a
//! per-worker `cells` map keyed by category id in canonical column order.

use crate::{ActivityLookup, CategoryId, GroupId, WorkerId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An immutable published projection of the authoritative model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Monotonic revision, assigned by the publisher at publish time
    pub revision: u64,
    /// Manual assignment mode flag
    pub manual_priorities: bool,
    /// Task categories in canonical column order
    pub categories: Vec<SnapshotCategory>,
    /// Groups in display order
    pub groups: Vec<SnapshotGroup>,
}

/// One task category on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCategory {
    /// Stable string id
    pub id: CategoryId,
    /// Display label
    pub label: String,
    /// Abbreviated column header label
    pub short_label: String,
}

/// One group on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotGroup {
    /// Stable integer id
    pub id: GroupId,
    /// Display label
    pub label: String,
    /// Workers in display order
    pub workers: Vec<SnapshotWorker>,
}

/// One worker row on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotWorker {
    /// Stable integer id
    pub id: WorkerId,
    /// Display name
    pub name: String,
    /// Cells keyed by category id, in canonical column order
    pub cells: IndexMap<CategoryId, SnapshotCell>,
}

/// One cell on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCell {
    /// False when the worker can never perform this category
    pub available: bool,
    /// Priority (0 disabled, 1..4 ranked)
    pub priority: i32,
    /// Skill level; omitted when the category has no relevant skill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<i32>,
    /// Passion tier; omitted when the category has no relevant skill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passion: Option<i32>,
    /// Whether the worker's policy opposes this category
    pub ideology_opposed: bool,
    /// Display-only activity score overlaid at read time
    pub activity_score: f32,
    /// Display-only recent-activity flag overlaid at read time
    pub recently_active: bool,
}

impl Snapshot {
    /// Overlay display-only activity data onto a copy of this snapshot
    ///
    /// Enrichment never feeds back into authoritative state: the overlay
    /// happens on the outward-facing copy at read time. Workers without a
    /// sample keep zeroed activity fields; unavailable cells are left
    /// untouched so placeholders stay inert.
    pub fn with_activity(&self, lookup: &dyn ActivityLookup) -> Snapshot {
        let mut enriched = self.clone();
        for group in &mut enriched.groups {
            for worker in &mut group.workers {
                let Some(sample) = lookup.lookup_activity(worker.id) else {
                    continue;
                };
                for cell in worker.cells.values_mut() {
                    if cell.available {
                        cell.activity_score = sample.score;
                        cell.recently_active = sample.recently_active;
                    }
                }
            }
        }
        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivitySample, Cell};

    fn sample_snapshot() -> Snapshot {
        let mut cells = IndexMap::new();
        cells.insert(
            CategoryId::new("Cooking"),
            SnapshotCell {
                available: true,
                priority: 3,
                skill_level: Some(8),
                passion: Some(1),
                ideology_opposed: false,
                activity_score: 0.0,
                recently_active: false,
            },
        );
        cells.insert(
            CategoryId::new("Hunting"),
            SnapshotCell {
                available: false,
                priority: 0,
                skill_level: None,
                passion: None,
                ideology_opposed: true,
                activity_score: 0.0,
                recently_active: false,
            },
        );
        Snapshot {
            revision: 1,
            manual_priorities: true,
            categories: vec![
                SnapshotCategory {
                    id: CategoryId::new("Cooking"),
                    label: "Cooking".into(),
                    short_label: "Cook".into(),
                },
                SnapshotCategory {
                    id: CategoryId::new("Hunting"),
                    label: "Hunting".into(),
                    short_label: "Hunt".into(),
                },
            ],
            groups: vec![SnapshotGroup {
                id: GroupId::new(1),
                label: "Base".into(),
                workers: vec![SnapshotWorker {
                    id: WorkerId::new(7),
                    name: "Ada".into(),
                    cells,
                }],
            }],
        }
    }

    #[test]
    fn test_wire_contract_keys() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["revision"], 1);
        assert_eq!(json["manualPriorities"], true);
        assert_eq!(json["categories"][0]["shortLabel"], "Cook");
        assert_eq!(json["groups"][0]["label"], "Base");

        let cell = &json["groups"][0]["workers"][0]["cells"]["Cooking"];
        assert_eq!(cell["available"], true);
        assert_eq!(cell["priority"], 3);
        assert_eq!(cell["skillLevel"], 8);
        assert_eq!(cell["passion"], 1);
        assert_eq!(cell["ideologyOpposed"], false);
        assert_eq!(cell["activityScore"], 0.0);
        assert_eq!(cell["recentlyActive"], false);
    }

    #[test]
    fn test_absent_skill_fields_omitted() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();

        let cell = &json["groups"][0]["workers"][0]["cells"]["Hunting"];
        assert!(cell.get("skillLevel").is_none());
        assert!(cell.get("passion").is_none());
        // Distinguishable from an explicit zero.
        assert_ne!(
            json["groups"][0]["workers"][0]["cells"]["Cooking"]["skillLevel"],
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_cell_ordering_follows_categories() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let cooking = json.find("\"Cooking\":{").unwrap();
        let hunting = json.find("\"Hunting\":{").unwrap();
        assert!(cooking < hunting);
    }

    struct FixedActivity;

    impl ActivityLookup for FixedActivity {
        fn lookup_activity(&self, worker: WorkerId) -> Option<ActivitySample> {
            (worker == WorkerId::new(7)).then_some(ActivitySample {
                score: 0.75,
                recently_active: true,
            })
        }
    }

    #[test]
    fn test_with_activity_overlays_available_cells_only() {
        let snapshot = sample_snapshot();
        let enriched = snapshot.with_activity(&FixedActivity);

        let worker = &enriched.groups[0].workers[0];
        let cooking = &worker.cells[&CategoryId::new("Cooking")];
        assert_eq!(cooking.activity_score, 0.75);
        assert!(cooking.recently_active);

        let hunting = &worker.cells[&CategoryId::new("Hunting")];
        assert_eq!(hunting.activity_score, 0.0);
        assert!(!hunting.recently_active);

        // The original snapshot is untouched.
        let original = &snapshot.groups[0].workers[0].cells[&CategoryId::new("Cooking")];
        assert_eq!(original.activity_score, 0.0);
    }

    #[test]
    fn test_default_cell_is_placeholder() {
        let cell = Cell::default();
        assert!(!cell.available);
        assert_eq!(cell.priority, 0);
    }
}
