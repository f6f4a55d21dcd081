//! Dirwatch core library — directory polling, progress tracking, marker scanning.
//!
//! Public API surface:
//! - [`config`] — [`WatchConfig`], [`ExtensionFilter`], interval parsing
//! - [`discovery`] — directory listing with extension filtering
//! - [`state`] — [`StateTable`], per-file scan progress
//! - [`diff`] — [`ChangeSet`] between two listings
//! - [`scanner`] — incremental marker scan over tracked files
//! - [`cycle`] — [`DirWatcher`], one complete poll
//! - [`events`] — [`WatchEvent`]
//! - [`error`] — [`WatchError`], [`ConfigError`]

pub mod config;
pub mod cycle;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod events;
pub mod scanner;
pub mod state;

pub use config::{parse_interval, ExtensionFilter, WatchConfig, DEFAULT_INTERVAL};
pub use cycle::{CycleReport, DirWatcher};
pub use diff::ChangeSet;
pub use error::{ConfigError, WatchError};
pub use events::WatchEvent;
pub use state::StateTable;
