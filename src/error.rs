//! Frame graph error types.
//!
//! Misuse of the construction API (stale handles, building twice, declaring
//! resources after build) panics. The errors here are the conditions a caller
//! can react to at runtime.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::PoolError;

/// Errors returned by frame graph execution and export.
#[derive(Error, Debug)]
pub enum FrameGraphError {
    #[error("resource pool failed: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to export graph to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for frame graph operations.
pub type FrameGraphResult<T> = Result<T, FrameGraphError>;
