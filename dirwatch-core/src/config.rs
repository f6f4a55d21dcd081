//! Validated watch parameters handed from the CLI layer to the core.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Poll interval used when none (or an unusable one) is supplied.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Which directory entries are watched, by file extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionFilter {
    /// Every entry in the directory.
    #[default]
    All,
    /// Only entries whose extension is exactly this string (no leading dot).
    Only(String),
}

impl ExtensionFilter {
    /// Empty input means "all entries"; a single leading `.` is ignored.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if ext.is_empty() {
            ExtensionFilter::All
        } else {
            ExtensionFilter::Only(ext.to_string())
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            ExtensionFilter::All => true,
            ExtensionFilter::Only(ext) => path.extension() == Some(OsStr::new(ext)),
        }
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionFilter::All => f.write_str("*"),
            ExtensionFilter::Only(ext) => write!(f, "*.{ext}"),
        }
    }
}

/// Parse a poll interval in whole seconds, falling back to [`DEFAULT_INTERVAL`].
pub fn parse_interval(raw: Option<&str>) -> Duration {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_INTERVAL;
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            tracing::warn!(
                interval = raw,
                default_secs = DEFAULT_INTERVAL.as_secs(),
                "invalid poll interval, using default",
            );
            DEFAULT_INTERVAL
        }
    }
}

/// Everything a watcher needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub directory: PathBuf,
    pub marker: String,
    pub extension: ExtensionFilter,
    pub interval: Duration,
}

impl WatchConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        marker: impl Into<String>,
        extension: ExtensionFilter,
    ) -> Self {
        Self {
            directory: directory.into(),
            marker: marker.into(),
            extension,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Validate raw optional inputs. Missing arguments are reported in the
    /// order directory, marker, extension.
    pub fn from_raw(
        directory: Option<PathBuf>,
        marker: Option<String>,
        extension: Option<String>,
        interval: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let directory = directory.ok_or(ConfigError::Missing("directory"))?;
        let marker = marker.ok_or(ConfigError::Missing("text"))?;
        let extension = extension.ok_or(ConfigError::Missing("extension"))?;
        if marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(Self::new(directory, marker, ExtensionFilter::new(&extension))
            .with_interval(parse_interval(interval)))
    }
}
