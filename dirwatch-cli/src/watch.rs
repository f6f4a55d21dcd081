//! Argument parsing and dispatch to the poll loop or a single cycle.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use dirwatch_core::{DirWatcher, WatchConfig};
use dirwatch_daemon::{init_tracing, start_blocking, LogFormat};

#[derive(Parser, Debug)]
#[command(
    name = "dirwatcher",
    version,
    about = "Watch a directory for files containing a magic text",
    long_about = None,
    arg_required_else_help = true,
)]
pub struct WatchArgs {
    /// Directory to watch.
    #[arg(short = 'd', long = "todir", env = "DIRWATCHER_DIR")]
    pub directory: Option<PathBuf>,

    /// Text to search for in watched files.
    #[arg(short = 't', long = "text", env = "DIRWATCHER_TEXT")]
    pub text: Option<String>,

    /// Extension of files to watch, without the dot. Empty watches every file.
    #[arg(short = 'e', long = "extension", env = "DIRWATCHER_EXT")]
    pub extension: Option<String>,

    /// Polling interval in seconds (defaults to 1 when absent or invalid).
    #[arg(
        short = 'i',
        long = "interval",
        env = "DIRWATCHER_INTERVAL",
        num_args = 0..=1,
        default_missing_value = "1"
    )]
    pub interval: Option<String>,

    /// Log record format.
    #[arg(long, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Run a single cycle, print its events as JSON lines, and exit.
    #[arg(long)]
    pub once: bool,
}

impl WatchArgs {
    pub fn run(self, started_at: Instant) -> Result<ExitCode> {
        init_tracing(self.log_format);

        let config = WatchConfig::from_raw(
            self.directory,
            self.text,
            self.extension,
            self.interval.as_deref(),
        )
        .context("invalid arguments")?;

        if self.once {
            return run_once(&config);
        }

        let summary = start_blocking(&config, started_at).context("dirwatcher exited with error")?;
        tracing::debug!(
            cycles = summary.cycles,
            failed_cycles = summary.failed_cycles,
            matches = summary.matches,
            "poll loop finished",
        );
        Ok(ExitCode::SUCCESS)
    }
}

fn run_once(config: &WatchConfig) -> Result<ExitCode> {
    let mut watcher = DirWatcher::from_config(config);
    let report = match watcher.run_cycle() {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(
                event = "cycle_error",
                directory = %err.path().display(),
                reason = %err,
                "watch cycle failed",
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    for failure in &report.failures {
        tracing::warn!(
            event = "scan_error",
            path = %failure.path().display(),
            reason = %failure,
            "skipping file",
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for event in &report.events {
        let line = serde_json::to_string(event).context("failed to encode event")?;
        writeln!(out, "{line}").context("failed to write event")?;
    }
    Ok(ExitCode::SUCCESS)
}
