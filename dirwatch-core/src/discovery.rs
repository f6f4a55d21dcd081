//! Directory listing with extension filtering.
//!
//! Lists the immediate children of the watched directory. Subdirectories are
//! not descended into, and are not told apart from files: a directory named
//! `archive.log` is returned for a `log` filter like any other entry.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ExtensionFilter;
use crate::error::WatchError;

/// Paths found by one listing. Transient, recomputed every cycle.
pub type DirectorySnapshot = BTreeSet<PathBuf>;

/// Absolute form of `directory`, without resolving symlinks.
pub fn absolute_dir(directory: &Path) -> Result<PathBuf, WatchError> {
    std::path::absolute(directory).map_err(|source| WatchError::DirectoryUnavailable {
        directory: directory.to_path_buf(),
        source,
    })
}

/// List absolute paths of entries directly inside `directory` that pass `filter`.
pub fn discover(directory: &Path, filter: &ExtensionFilter) -> Result<DirectorySnapshot, WatchError> {
    let root = absolute_dir(directory)?;
    let unavailable = |source| WatchError::DirectoryUnavailable {
        directory: root.clone(),
        source,
    };

    let mut snapshot = DirectorySnapshot::new();
    for entry in fs::read_dir(&root).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        let path = root.join(entry.file_name());
        if filter.matches(&path) {
            snapshot.insert(path);
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").expect("write");
        path
    }

    #[test]
    fn lists_matching_entries_as_absolute_paths() {
        let dir = TempDir::new().expect("tempdir");
        let a = touch(dir.path(), "a.log");
        touch(dir.path(), "b.txt");
        let c = touch(dir.path(), "c.log");

        let found = discover(dir.path(), &ExtensionFilter::new("log")).expect("discover");
        assert_eq!(found, DirectorySnapshot::from([a, c]));
        assert!(found.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn unfiltered_listing_returns_everything() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "a.log");
        touch(dir.path(), "README");
        touch(dir.path(), ".hidden");

        let found = discover(dir.path(), &ExtensionFilter::All).expect("discover");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn does_not_recurse_but_keeps_matching_subdirectory_names() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("archive.log");
        fs::create_dir(&nested).expect("mkdir");
        touch(&nested, "inner.log");

        let found = discover(dir.path(), &ExtensionFilter::new("log")).expect("discover");
        assert_eq!(found, DirectorySnapshot::from([nested]));
    }

    #[test]
    fn relative_directory_is_made_absolute() {
        let found = discover(Path::new("."), &ExtensionFilter::new("no-such-extension"))
            .expect("discover cwd");
        assert!(found.is_empty());
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("gone");

        let err = discover(&missing, &ExtensionFilter::All).unwrap_err();
        assert!(matches!(err, WatchError::DirectoryUnavailable { .. }), "got: {err}");
        assert_eq!(err.path(), missing.as_path());
    }
}
