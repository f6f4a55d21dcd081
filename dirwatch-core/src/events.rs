//! Events reported by a watch cycle.

use std::path::PathBuf;

use serde::Serialize;

/// Something a cycle observed. Emitted and logged, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    FileAdded {
        path: PathBuf,
    },
    FileDeleted {
        path: PathBuf,
    },
    /// `line` is 1-based.
    MatchFound {
        path: PathBuf,
        line: usize,
        marker: String,
    },
    /// The file now has fewer lines than were already scanned and is being
    /// rescanned from the top.
    FileTruncated {
        path: PathBuf,
        previous_lines: usize,
        current_lines: usize,
    },
}

impl WatchEvent {
    /// Short machine-readable name, matching the serialized `event` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            WatchEvent::FileAdded { .. } => "file_added",
            WatchEvent::FileDeleted { .. } => "file_deleted",
            WatchEvent::MatchFound { .. } => "match_found",
            WatchEvent::FileTruncated { .. } => "file_truncated",
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            WatchEvent::FileAdded { path }
            | WatchEvent::FileDeleted { path }
            | WatchEvent::MatchFound { path, .. }
            | WatchEvent::FileTruncated { path, .. } => path,
        }
    }

    /// Write this event to the tracing log with structured fields.
    pub fn log(&self) {
        let kind = self.kind();
        match self {
            WatchEvent::FileAdded { path } => {
                tracing::info!(event = kind, path = %path.display(), "file added");
            }
            WatchEvent::FileDeleted { path } => {
                tracing::info!(event = kind, path = %path.display(), "file deleted");
            }
            WatchEvent::MatchFound { path, line, marker } => {
                tracing::info!(
                    event = kind,
                    path = %path.display(),
                    line = *line,
                    marker = %marker,
                    "magic text found",
                );
            }
            WatchEvent::FileTruncated {
                path,
                previous_lines,
                current_lines,
            } => {
                tracing::warn!(
                    event = kind,
                    path = %path.display(),
                    previous_lines = *previous_lines,
                    current_lines = *current_lines,
                    "file shrank, rescanning from the first line",
                );
            }
        }
    }
}
