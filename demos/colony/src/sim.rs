//! A scripted colony simulation playing the owning-thread role
//!
//! The simulation owns the authoritative grid. Everything here runs on one
//! dedicated host thread: the scripted mutation loop, the jobs marshaled in
//! from the web write path, and every capture. The replication hub only ever
//! sees deltas and captures.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};
use workgrid_core::{
    ActivityLookup, ActivitySample, CategoryId, Delta, GroupId, RawCapture, RawCategory, RawCell,
    RawGroup, RawWorker, WorkerId, MAX_PRIORITY,
};
use workgrid_sync::{Error, HostDispatcher, HostJob, Hub, SimulationHost};

/// Shared display-only activity data, updated by the host thread
///
/// Implements the enrichment capability interface the web layer consumes.
#[derive(Debug, Default)]
pub struct ActivityBoard {
    samples: Mutex<HashMap<WorkerId, ActivitySample>>,
}

impl ActivityBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a worker's latest activity
    pub fn record(&self, worker: WorkerId, score: f32, recently_active: bool) {
        self.samples.lock().expect("activity board poisoned").insert(
            worker,
            ActivitySample {
                score,
                recently_active,
            },
        );
    }
}

impl ActivityLookup for ActivityBoard {
    fn lookup_activity(&self, worker: WorkerId) -> Option<ActivitySample> {
        self.samples
            .lock()
            .expect("activity board poisoned")
            .get(&worker)
            .copied()
    }
}

/// Marshals web write jobs onto the host thread over a channel
pub struct ChannelDispatcher {
    tx: Sender<HostJob>,
}

impl ChannelDispatcher {
    pub fn new(tx: Sender<HostJob>) -> Self {
        Self { tx }
    }
}

impl HostDispatcher for ChannelDispatcher {
    fn dispatch(&self, job: HostJob) -> workgrid_sync::Result<()> {
        self.tx.send(job).map_err(|_| Error::HostUnavailable)
    }
}

struct SimWorker {
    id: WorkerId,
    name: String,
    /// Aligned with the category list
    cells: Vec<RawCell>,
}

struct SimGroup {
    id: GroupId,
    label: String,
    workers: Vec<SimWorker>,
}

/// The live colony state
pub struct ColonySim {
    manual: bool,
    categories: Vec<RawCategory>,
    groups: Vec<SimGroup>,
    hub: Arc<Hub>,
    activity: Arc<ActivityBoard>,
}

impl ColonySim {
    /// Build the starting colony: two groups of workers across six task
    /// categories
    pub fn bootstrap(hub: Arc<Hub>, activity: Arc<ActivityBoard>) -> Self {
        let categories = vec![
            RawCategory::new("Firefight", "Firefight", "Fire"),
            RawCategory::new("Doctor", "Doctor", "Doc"),
            RawCategory::new("Cooking", "Cooking", "Cook"),
            RawCategory::new("Hunting", "Hunting", "Hunt"),
            RawCategory::new("Construction", "Construction", "Build"),
            RawCategory::new("Mining", "Mining", "Mine"),
        ];

        let roster: [(&str, u64, &[usize]); 4] = [
            ("Ada", 7, &[3]),
            ("Kim", 8, &[]),
            ("Sol", 9, &[1, 5]),
            ("Rue", 12, &[0]),
        ];

        let mut workers = Vec::new();
        for (name, id, blocked) in roster {
            let cells = (0..categories.len())
                .map(|position| RawCell {
                    priority: if blocked.contains(&position) { 0 } else { 3 },
                    skill_level: (position % 2 == 0).then_some((id % 10) as i32),
                    passion: (position % 2 == 0).then_some((id % 3) as i32),
                    ideology_opposed: position == 3 && id == 9,
                    available: !blocked.contains(&position),
                })
                .collect();
            workers.push(SimWorker {
                id: WorkerId::new(id),
                name: name.to_string(),
                cells,
            });
        }

        let (north, south) = {
            let mut all = workers;
            let south = all.split_off(2);
            (all, south)
        };

        Self {
            manual: true,
            categories,
            groups: vec![
                SimGroup {
                    id: GroupId::new(1),
                    label: "North Camp".to_string(),
                    workers: north,
                },
                SimGroup {
                    id: GroupId::new(2),
                    label: "South Camp".to_string(),
                    workers: south,
                },
            ],
            hub,
            activity,
        }
    }

    fn category_position(&self, category: &CategoryId) -> Option<usize> {
        self.categories.iter().position(|c| &c.id == category)
    }

    /// One step of the scripted mutation loop
    ///
    /// Deterministic: walks the grid round-robin, cycling priorities, and
    /// periodically flips the mode or forces a structural resync so every
    /// pipeline path gets exercised.
    pub fn scripted_step(&mut self, step: u64) {
        if step % 23 == 19 {
            self.manual = !self.manual;
            self.hub.notify(Delta::mode_changed(self.manual));
            debug!(manual = self.manual, "scripted mode flip");
            return;
        }

        if step % 97 == 53 {
            // A structural change: mark the model stale, then capture with
            // the topology already settled so nothing is lost.
            self.hub.notify(Delta::FullResyncRequired);
            let capture = self.capture();
            self.hub.request_resync(capture);
            debug!("scripted structural resync");
            return;
        }

        let group_count = self.groups.len() as u64;
        let group = &mut self.groups[(step % group_count) as usize];
        let worker_count = group.workers.len() as u64;
        let worker = &mut group.workers[((step / group_count) % worker_count) as usize];
        let position = (step as usize / 3) % self.categories.len();

        let cell = &mut worker.cells[position];
        if !cell.available {
            return;
        }
        cell.priority = (step % (MAX_PRIORITY as u64 + 1)) as i32;

        let category = self.categories[position].id.clone();
        self.hub
            .notify(Delta::priority_changed(worker.id, category, cell.priority));
        self.activity
            .record(worker.id, (step % 10) as f32 / 10.0, step % 3 == 0);
    }
}

impl SimulationHost for ColonySim {
    fn capture(&mut self) -> RawCapture {
        let mut capture = RawCapture::new(self.manual);
        capture.categories = self.categories.clone();
        for group in &self.groups {
            let mut raw_group = RawGroup::new(group.id, group.label.clone());
            for worker in &group.workers {
                let mut raw_worker = RawWorker::new(worker.id, worker.name.clone());
                let mut cells = IndexMap::with_capacity(worker.cells.len());
                for (category, cell) in self.categories.iter().zip(&worker.cells) {
                    cells.insert(category.id.clone(), *cell);
                }
                raw_worker.cells = cells;
                raw_group.workers.push(raw_worker);
            }
            capture.groups.push(raw_group);
        }
        capture
    }

    fn apply_priority(
        &mut self,
        group: GroupId,
        worker: WorkerId,
        category: &CategoryId,
        priority: i32,
    ) -> workgrid_sync::Result<()> {
        let position = self
            .category_position(category)
            .ok_or_else(|| Error::UnknownCategory(category.clone()))?;
        let sim_group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group)
            .ok_or(Error::UnknownGroup(group))?;
        let sim_worker = sim_group
            .workers
            .iter_mut()
            .find(|w| w.id == worker)
            .ok_or(Error::UnknownWorker(worker))?;

        let cell = &mut sim_worker.cells[position];
        if !cell.available {
            return Err(Error::CellUnavailable {
                worker,
                category: category.clone(),
            });
        }
        cell.priority = priority;

        // Close the loop: the mutation notifies the hub exactly like the
        // scripted one does.
        self.hub
            .notify(Delta::priority_changed(worker, category.clone(), priority));
        self.activity.record(worker, 1.0, true);
        Ok(())
    }
}

/// Run the owning thread: bootstrap capture, then alternate between
/// marshaled write jobs and scripted simulation steps
pub fn run_host_loop(mut sim: ColonySim, rx: Receiver<HostJob>, stop: Arc<AtomicBool>) {
    let capture = sim.capture();
    sim.hub.request_resync(capture);
    info!("colony bootstrapped");

    let mut step = 0u64;
    while !stop.load(Ordering::Relaxed) {
        match rx.recv_timeout(Duration::from_millis(400)) {
            Ok(job) => job(&mut sim),
            Err(RecvTimeoutError::Timeout) => {
                sim.scripted_step(step);
                step += 1;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("colony host loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sim() -> ColonySim {
        let hub = Arc::new(Hub::new().unwrap());
        ColonySim::bootstrap(hub, Arc::new(ActivityBoard::new()))
    }

    #[test]
    fn test_capture_shape() {
        let mut sim = test_sim();
        let capture = sim.capture();
        assert_eq!(capture.categories.len(), 6);
        assert_eq!(capture.groups.len(), 2);
        for group in &capture.groups {
            for worker in &group.workers {
                assert_eq!(worker.cells.len(), 6);
            }
        }
    }

    #[test]
    fn test_apply_priority_rejects_unknown_entities() {
        let mut sim = test_sim();
        let cooking = CategoryId::new("Cooking");

        let err = sim
            .apply_priority(GroupId::new(9), WorkerId::new(7), &cooking, 1)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownGroup(_)));

        let err = sim
            .apply_priority(GroupId::new(1), WorkerId::new(99), &cooking, 1)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownWorker(_)));

        let err = sim
            .apply_priority(GroupId::new(1), WorkerId::new(7), &CategoryId::new("Nope"), 1)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(_)));
    }

    #[test]
    fn test_apply_priority_refuses_unavailable_cell() {
        let mut sim = test_sim();
        // Ada (worker 7) is blocked on position 3: Hunting.
        let err = sim
            .apply_priority(
                GroupId::new(1),
                WorkerId::new(7),
                &CategoryId::new("Hunting"),
                2,
            )
            .unwrap_err();
        assert!(matches!(err, Error::CellUnavailable { .. }));
    }

    #[test]
    fn test_apply_priority_mutates_and_notifies() {
        let mut sim = test_sim();
        sim.apply_priority(
            GroupId::new(1),
            WorkerId::new(7),
            &CategoryId::new("Cooking"),
            2,
        )
        .unwrap();

        let capture = sim.capture();
        let cell = &capture.groups[0].workers[0].cells[&CategoryId::new("Cooking")];
        assert_eq!(cell.priority, 2);
        assert!(sim
            .activity
            .lookup_activity(WorkerId::new(7))
            .unwrap()
            .recently_active);
    }
}
