//! The priority write path
//!
//! Requests are validated here, at the web boundary, before anything is
//! allowed near the owning thread; the only silent coercion is serde's
//! missing-field default (a missing integer reads as 0, a missing string as
//! empty, which validation then rejects for the category). A valid request
//! is marshaled onto the owning thread through the [`HostDispatcher`] and
//! answered immediately; convergence is the polling loop's job.

use crate::{Error, Result};
use serde::Deserialize;
use tracing::warn;
use workgrid_core::{CategoryId, GroupId, WorkerId, MAX_PRIORITY};
use workgrid_sync::{HostDispatcher, HostJob};

/// A client request to change one cell's priority
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetPriorityRequest {
    /// Target group id
    pub group_id: u64,
    /// Target worker id
    pub worker_id: u64,
    /// Target category id
    pub category_id: String,
    /// New priority (0 disables)
    pub priority: i32,
}

impl SetPriorityRequest {
    /// Parse a request body
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|err| Error::InvalidRequest(err.to_string()))
    }

    /// Reject shapes that must never reach the owning thread
    pub fn validate(&self) -> Result<()> {
        if self.category_id.is_empty() {
            return Err(Error::MissingCategory);
        }
        if !(0..=MAX_PRIORITY).contains(&self.priority) {
            return Err(Error::PriorityOutOfRange(self.priority));
        }
        Ok(())
    }
}

/// Hand a validated request to the owning thread
///
/// Returns as soon as the job is dispatched. A rejection by live state
/// (entity departed, cell unavailable) is logged on the owning thread and
/// otherwise dropped; the client's next poll shows the authoritative
/// outcome either way.
pub fn submit(dispatcher: &dyn HostDispatcher, request: SetPriorityRequest) -> Result<()> {
    let job: HostJob = Box::new(move |host| {
        let group = GroupId::new(request.group_id);
        let worker = WorkerId::new(request.worker_id);
        let category = CategoryId::new(request.category_id);
        if let Err(err) = host.apply_priority(group, worker, &category, request.priority) {
            warn!(%group, %worker, %category, error = %err, "priority write rejected");
        }
    });
    dispatcher.dispatch(job)?;
    Ok(())
}
