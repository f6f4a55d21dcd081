//! Error types for dirwatch-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while polling a directory or scanning its files.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The watched directory is missing or cannot be listed. Fails one cycle.
    #[error("directory {directory} is unavailable: {source}")]
    DirectoryUnavailable {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tracked file disappeared between listing and reading.
    #[error("file {path} vanished before it could be scanned: {source}")]
    FileVanished {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tracked path exists but could not be read (permissions, a directory, ...).
    #[error("file {path} could not be read: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WatchError {
    /// Path the failure refers to (the directory for cycle-level failures).
    pub fn path(&self) -> &std::path::Path {
        match self {
            WatchError::DirectoryUnavailable { directory, .. } => directory,
            WatchError::FileVanished { path, .. } | WatchError::FileUnreadable { path, .. } => path,
        }
    }
}

/// Invalid or missing startup input. Fatal before the poll loop starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required argument: {0}")]
    Missing(&'static str),

    #[error("marker text must not be empty")]
    EmptyMarker,
}

/// Classify an I/O failure on a tracked file.
pub(crate) fn file_err(path: impl Into<PathBuf>, source: std::io::Error) -> WatchError {
    let path = path.into();
    if source.kind() == std::io::ErrorKind::NotFound {
        WatchError::FileVanished { path, source }
    } else {
        WatchError::FileUnreadable { path, source }
    }
}
