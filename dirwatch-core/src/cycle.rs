//! One complete poll of the watched directory.

use std::path::PathBuf;

use crate::config::{ExtensionFilter, WatchConfig};
use crate::diff::ChangeSet;
use crate::discovery::discover;
use crate::error::WatchError;
use crate::events::WatchEvent;
use crate::scanner::scan_all;
use crate::state::StateTable;

/// What a successful cycle observed.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Additions, then deletions, then matches.
    pub events: Vec<WatchEvent>,
    /// Files that could not be scanned this cycle.
    pub failures: Vec<WatchError>,
}

impl CycleReport {
    pub fn match_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WatchEvent::MatchFound { .. }))
            .count()
    }
}

/// Owns the [`StateTable`] for one directory and drives it one cycle at a time.
#[derive(Debug, Clone)]
pub struct DirWatcher {
    directory: PathBuf,
    marker: String,
    extension: ExtensionFilter,
    state: StateTable,
}

impl DirWatcher {
    pub fn new(
        directory: impl Into<PathBuf>,
        marker: impl Into<String>,
        extension: ExtensionFilter,
    ) -> Self {
        Self {
            directory: directory.into(),
            marker: marker.into(),
            extension,
            state: StateTable::new(),
        }
    }

    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(
            config.directory.clone(),
            config.marker.clone(),
            config.extension.clone(),
        )
    }

    pub fn state(&self) -> &StateTable {
        &self.state
    }

    /// List the directory, apply additions and deletions, then scan every
    /// tracked file.
    ///
    /// # Errors
    /// Returns [`WatchError::DirectoryUnavailable`] when the directory cannot be
    /// listed; tracking state is left untouched in that case. Per-file failures
    /// are collected in [`CycleReport::failures`] instead.
    pub fn run_cycle(&mut self) -> Result<CycleReport, WatchError> {
        let snapshot = discover(&self.directory, &self.extension)?;
        let changes = ChangeSet::between(self.state.paths(), &snapshot);

        let mut report = CycleReport::default();
        for path in changes.added {
            self.state.track(path.clone());
            report.events.push(WatchEvent::FileAdded { path });
        }
        for path in changes.removed {
            self.state.forget(&path);
            report.events.push(WatchEvent::FileDeleted { path });
        }

        let scanned = scan_all(&mut self.state, &self.marker);
        report.events.extend(scanned.events);
        report.failures = scanned.failures;
        Ok(report)
    }
}
