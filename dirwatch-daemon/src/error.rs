use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the poll loop runtime.
///
/// Cycle and per-file failures never appear here; they are logged and the loop
/// carries on.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("{task} task join failure: {reason}")]
    TaskJoin { task: &'static str, reason: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
