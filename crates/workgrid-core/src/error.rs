//! Error types for workgrid-core

use crate::CategoryId;
use thiserror::Error;

/// Core error type
///
/// Only capture/build failures surface as errors; stale references during
/// delta application are silent no-ops by design (see [`crate::Model::apply`]).
#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate category id in capture: {0}")]
    DuplicateCategory(CategoryId),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
