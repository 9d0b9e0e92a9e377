//! Pure builder functions: capture → model, model → snapshot
//!
//! Both directions allocate: `build_model` because the model is a fresh
//! indexed structure owned by the worker thread, `build_snapshot` because the
//! snapshot must not alias the model it was projected from. The copy cost is
//! the price of lock-free snapshot handoff.

use crate::{
    Category, Cell, Error, Group, Model, RawCapture, RawCell, Result, Snapshot, SnapshotCategory,
    SnapshotCell, SnapshotGroup, SnapshotWorker, Worker,
};
use indexmap::IndexMap;

/// Build an authoritative model from a full capture
///
/// Establishes the canonical category ordering and index map, then allocates
/// every worker's cell vector sized to the category count. Cells referencing
/// a category missing from the canonical list are dropped without error;
/// capture data is trusted to reference only known categories, but resilience
/// against unknown keys is required. A duplicate category id is a malformed
/// capture and fails the build.
pub fn build_model(capture: &RawCapture) -> Result<Model> {
    let mut model = Model::new(capture.manual_priorities);

    for raw in &capture.categories {
        let category = Category {
            id: raw.id.clone(),
            label: raw.label.clone(),
            short_label: raw.short_label.clone(),
        };
        if model.push_category(category).is_none() {
            return Err(Error::DuplicateCategory(raw.id.clone()));
        }
    }

    let category_count = model.category_count();
    for raw_group in &capture.groups {
        let mut group = Group::new(raw_group.id, raw_group.label.clone());
        for raw_worker in &raw_group.workers {
            let mut worker = Worker::new(raw_worker.id, raw_worker.name.clone());
            worker.ensure_cells(category_count);
            for (category, raw_cell) in &raw_worker.cells {
                let Some(position) = model.category_position(category) else {
                    continue;
                };
                if let Some(cell) = worker.cell_mut(position) {
                    *cell = cell_from_raw(raw_cell);
                }
            }
            group.push_worker(worker);
        }
        model.push_group(group);
    }

    Ok(model)
}

fn cell_from_raw(raw: &RawCell) -> Cell {
    Cell {
        priority: raw.priority,
        skill_level: raw.skill_level,
        passion: raw.passion,
        ideology_opposed: raw.ideology_opposed,
        available: raw.available,
    }
}

/// Project a model into an immutable snapshot
///
/// Deep-copies every group, worker, and cell; the result shares no storage
/// with the model. The revision field is left at 0 for the publisher to
/// assign. Workers whose cell vector is shorter than the category count
/// (never the case after a build, but cheap to tolerate) get placeholder
/// cells for the missing columns.
pub fn build_snapshot(model: &Model) -> Snapshot {
    let categories: Vec<SnapshotCategory> = model
        .categories()
        .iter()
        .map(|c| SnapshotCategory {
            id: c.id.clone(),
            label: c.label.clone(),
            short_label: c.short_label.clone(),
        })
        .collect();

    let groups = model
        .groups()
        .iter()
        .map(|group| SnapshotGroup {
            id: group.id,
            label: group.label.clone(),
            workers: group
                .workers()
                .iter()
                .map(|worker| project_worker(model, worker))
                .collect(),
        })
        .collect();

    Snapshot {
        revision: 0,
        manual_priorities: model.manual_priorities,
        categories,
        groups,
    }
}

fn project_worker(model: &Model, worker: &Worker) -> SnapshotWorker {
    let mut cells = IndexMap::with_capacity(model.category_count());
    for (position, category) in model.categories().iter().enumerate() {
        let cell = worker.cell(position).copied().unwrap_or_default();
        cells.insert(category.id.clone(), cell_to_snapshot(&cell));
    }
    SnapshotWorker {
        id: worker.id,
        name: worker.name.clone(),
        cells,
    }
}

fn cell_to_snapshot(cell: &Cell) -> SnapshotCell {
    SnapshotCell {
        available: cell.available,
        priority: cell.priority,
        skill_level: cell.skill_level,
        passion: cell.passion,
        ideology_opposed: cell.ideology_opposed,
        activity_score: 0.0,
        recently_active: false,
    }
}
