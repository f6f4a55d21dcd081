//! Per-file scan progress.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Maps each watched absolute path to the zero-based index of the first line
/// not yet scanned.
///
/// Owned by a single [`DirWatcher`](crate::DirWatcher); nothing else mutates it.
/// Entries start at 0 when a path first appears and are dropped when it
/// disappears from a listing, so a re-created file is scanned from the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTable {
    files: BTreeMap<PathBuf, usize>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `path` at line 0. Returns `false` if already tracked,
    /// in which case its progress is left untouched.
    pub fn track(&mut self, path: PathBuf) -> bool {
        if self.files.contains_key(&path) {
            return false;
        }
        self.files.insert(path, 0);
        true
    }

    /// Stop tracking `path`, returning its last progress.
    pub fn forget(&mut self, path: &Path) -> Option<usize> {
        self.files.remove(path)
    }

    pub fn next_line(&self, path: &Path) -> Option<usize> {
        self.files.get(path).copied()
    }

    /// Record that `path` has been scanned up to (not including) `next_line`.
    /// Untracked paths are ignored.
    pub fn advance(&mut self, path: &Path, next_line: usize) {
        if let Some(slot) = self.files.get_mut(path) {
            *slot = next_line;
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }

    /// Tracked paths with their progress, in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, usize)> {
        self.files.iter().map(|(path, line)| (path, *line))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
