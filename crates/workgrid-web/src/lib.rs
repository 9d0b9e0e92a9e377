//! Workgrid Web - the polling surface over a replication hub
//!
//! Serves the board wire contract over HTTP:
//! - `GET /board/revision` - the latest revision, for cheap change detection
//! - `GET /board/state` - the full snapshot, enriched with display-only
//!   activity data at read time
//! - `GET /board/config` - client hints (poll interval)
//! - `POST /board/priority` - the only write path; validated here, then
//!   marshaled onto the owning thread and answered fire-and-forget
//!
//! Clients are expected to poll `revision` and refetch `state` only when it
//! changes; an unchanged revision guarantees an unchanged state.

pub mod config;
mod error;
mod ingress;
mod router;
mod server;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use ingress::SetPriorityRequest;
pub use router::{handle_request, WebState};
pub use server::serve;
