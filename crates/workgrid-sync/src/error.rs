//! Error types for workgrid-sync

use thiserror::Error;
use workgrid_core::{CategoryId, GroupId, WorkerId};

/// Result type for workgrid-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the replication pipeline and host contracts
#[derive(Debug, Error)]
pub enum Error {
    /// The owning thread is gone; jobs can no longer be dispatched
    #[error("simulation host unavailable")]
    HostUnavailable,

    /// The replication worker thread panicked before or during shutdown
    #[error("replication worker panicked")]
    WorkerPanicked,

    /// The replication worker thread could not be spawned
    #[error("failed to spawn replication worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// A write named a group the live state does not have
    #[error("unknown {0}")]
    UnknownGroup(GroupId),

    /// A write named a worker the live state does not have
    #[error("unknown {0}")]
    UnknownWorker(WorkerId),

    /// A write named a category the live state does not have
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),

    /// A write targeted a cell the worker can never perform
    #[error("{worker} cannot perform {category}")]
    CellUnavailable {
        worker: WorkerId,
        category: CategoryId,
    },

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] workgrid_core::Error),
}
