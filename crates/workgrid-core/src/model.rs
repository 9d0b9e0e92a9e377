//! The worker-owned authoritative model
//!
//! Mutable, indexed representation of the current priority grid and the
//! single source of truth for snapshot generation. Created once per
//! bootstrap/resync by the builder, mutated only by the replication worker
//! through delta application, and replaced wholesale on resync. Never shared
//! across threads, so it needs no internal synchronization.

use crate::{CategoryId, Delta, GroupId, WorkerId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Result of applying one delta to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The delta was applied, or dropped as a stale-reference no-op
    Applied,
    /// The delta invalidated the whole model; the caller must discard it
    /// (and the rest of the batch) and rebuild from a fresh capture
    Invalidated,
}

/// One task category with its display labels
///
/// Canonical ordering is fixed at build time and never changes; cell vectors
/// are indexed by a category's position in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable string id
    pub id: CategoryId,
    /// Display label
    pub label: String,
    /// Abbreviated column header label
    pub short_label: String,
}

/// One cell of the grid: a worker's relationship to one task category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Priority (0 disabled, 1..4 ranked, lower is more urgent)
    pub priority: i32,
    /// Skill level; `None` when the category has no relevant skill
    pub skill_level: Option<i32>,
    /// Passion tier; `None` when the category has no relevant skill
    pub passion: Option<i32>,
    /// Whether the worker's policy opposes this category
    pub ideology_opposed: bool,
    /// False when the worker can never perform this category; such cells
    /// render as non-participating placeholders and never accept writes
    pub available: bool,
}

impl Default for Cell {
    /// The non-participating placeholder cell
    fn default() -> Self {
        Self {
            priority: 0,
            skill_level: None,
            passion: None,
            ideology_opposed: false,
            available: false,
        }
    }
}

/// One worker row of the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Stable integer id
    pub id: WorkerId,
    /// Display name
    pub name: String,
    /// Cells indexed by category position
    cells: Vec<Cell>,
}

impl Worker {
    /// Create a worker with no cells
    pub fn new(id: WorkerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cells: Vec::new(),
        }
    }

    /// Get the cell at a category position, if allocated
    pub fn cell(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }

    /// Get a mutable cell at a category position, if allocated
    pub fn cell_mut(&mut self, position: usize) -> Option<&mut Cell> {
        self.cells.get_mut(position)
    }

    /// Number of allocated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Grow the cell vector to at least `category_count` slots
    ///
    /// Existing values are preserved; new slots are filled with the default
    /// placeholder cell. Never shrinks.
    pub fn ensure_cells(&mut self, category_count: usize) {
        if self.cells.len() < category_count {
            self.cells.resize_with(category_count, Cell::default);
        }
    }
}

/// One group of workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Stable integer id
    pub id: GroupId,
    /// Display label
    pub label: String,
    workers: Vec<Worker>,
    worker_index: IndexMap<WorkerId, usize>,
}

impl Group {
    /// Create an empty group
    pub fn new(id: GroupId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            workers: Vec::new(),
            worker_index: IndexMap::new(),
        }
    }

    /// Append a worker, keeping the id index in sync
    ///
    /// A worker with an id already present is dropped; the first record wins.
    pub fn push_worker(&mut self, worker: Worker) {
        if self.worker_index.contains_key(&worker.id) {
            return;
        }
        self.worker_index.insert(worker.id, self.workers.len());
        self.workers.push(worker);
    }

    /// Look up a worker by id in O(1)
    pub fn worker(&self, id: WorkerId) -> Option<&Worker> {
        self.worker_index.get(&id).map(|&i| &self.workers[i])
    }

    /// Look up a mutable worker by id in O(1)
    pub fn worker_mut(&mut self, id: WorkerId) -> Option<&mut Worker> {
        let i = *self.worker_index.get(&id)?;
        Some(&mut self.workers[i])
    }

    /// Workers in display order
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }
}

/// The authoritative model of the whole grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Manual assignment mode; in automatic mode stored priorities are
    /// preserved but not user-editable
    pub manual_priorities: bool,
    categories: Vec<Category>,
    category_index: IndexMap<CategoryId, usize>,
    groups: Vec<Group>,
}

impl Model {
    /// Create an empty model with the given mode flag
    pub fn new(manual_priorities: bool) -> Self {
        Self {
            manual_priorities,
            categories: Vec::new(),
            category_index: IndexMap::new(),
            groups: Vec::new(),
        }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Append a category to the canonical ordering
    ///
    /// Returns the new category's position, or `None` if the id is already
    /// present (the builder treats that as a malformed capture).
    pub fn push_category(&mut self, category: Category) -> Option<usize> {
        if self.category_index.contains_key(&category.id) {
            return None;
        }
        let position = self.categories.len();
        self.category_index.insert(category.id.clone(), position);
        self.categories.push(category);
        Some(position)
    }

    /// Categories in canonical order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of categories
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Resolve a category id to its fixed position
    pub fn category_position(&self, id: &CategoryId) -> Option<usize> {
        self.category_index.get(id).copied()
    }

    // ========================================================================
    // Groups and workers
    // ========================================================================

    /// Append a group
    pub fn push_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Groups in display order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Find a worker by id, scanning groups
    ///
    /// Group count is small, so the linear scan over groups is acceptable;
    /// within a group the lookup is O(1).
    pub fn find_worker_mut(&mut self, id: WorkerId) -> Option<&mut Worker> {
        self.groups.iter_mut().find_map(|g| g.worker_mut(id))
    }

    // ========================================================================
    // Delta application
    // ========================================================================

    /// Apply one delta
    ///
    /// Stale references (a worker or category that no longer exists) are
    /// silent no-ops: departure races between the host enqueuing a delta and
    /// the worker applying it are expected and benign. Never panics and
    /// never returns an error.
    pub fn apply(&mut self, delta: &Delta) -> ApplyOutcome {
        match delta {
            Delta::ModeChanged { manual } => {
                self.manual_priorities = *manual;
                ApplyOutcome::Applied
            }
            Delta::PriorityChanged {
                worker,
                category,
                priority,
            } => {
                self.apply_priority_changed(*worker, category, *priority);
                ApplyOutcome::Applied
            }
            Delta::FullResyncRequired => ApplyOutcome::Invalidated,
        }
    }

    fn apply_priority_changed(&mut self, worker: WorkerId, category: &CategoryId, priority: i32) {
        let Some(position) = self.category_position(category) else {
            return;
        };
        let category_count = self.categories.len();
        let Some(worker) = self.find_worker_mut(worker) else {
            return;
        };
        worker.ensure_cells(category_count);
        if let Some(cell) = worker.cell_mut(position) {
            cell.priority = priority;
        }
    }
}
