//! Error types for workgrid-web

use thiserror::Error;

/// Result type for workgrid-web operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the web boundary
#[derive(Debug, Error)]
pub enum Error {
    /// The request body was not a valid write request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested priority is outside the accepted range
    #[error("priority {0} out of range 0..={max}", max = workgrid_core::MAX_PRIORITY)]
    PriorityOutOfRange(i32),

    /// The write request named no category
    #[error("missing category id")]
    MissingCategory,

    /// The owning thread could not be reached
    #[error("host dispatch failed: {0}")]
    Dispatch(#[from] workgrid_sync::Error),

    /// I/O error (config loading, listener setup)
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}
