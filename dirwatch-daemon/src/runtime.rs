use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::broadcast::{self, error::TryRecvError};

use dirwatch_core::{DirWatcher, WatchConfig, WatchError};

use crate::banner::{starting_banner, stopping_banner};
use crate::error::{io_err, DaemonError};
use crate::uptime::format_uptime;

/// Totals reported when the loop stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub matches: u64,
    pub uptime: String,
}

/// Runs watch cycles back to back, sleeping `interval` between them, until a
/// shutdown message arrives.
///
/// Cycles never overlap. Shutdown is checked before each cycle and raced
/// against the sleep, never in the middle of a scan. A closed shutdown
/// channel counts as a shutdown request.
pub struct PollLoop {
    watcher: DirWatcher,
    interval: Duration,
    started_at: Instant,
}

impl PollLoop {
    pub fn new(watcher: DirWatcher, interval: Duration, started_at: Instant) -> Self {
        Self {
            watcher,
            interval,
            started_at,
        }
    }

    pub async fn run(
        self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<LoopSummary, DaemonError> {
        let PollLoop {
            mut watcher,
            interval,
            started_at,
        } = self;
        let mut summary = LoopSummary {
            cycles: 0,
            failed_cycles: 0,
            matches: 0,
            uptime: String::new(),
        };

        loop {
            if shutdown_requested(&mut shutdown_rx) {
                break;
            }

            // The watcher moves onto the blocking pool and back so its state
            // keeps exactly one owner.
            let (returned, outcome) = tokio::task::spawn_blocking(move || {
                let outcome = watcher.run_cycle();
                (watcher, outcome)
            })
            .await
            .map_err(|err| DaemonError::TaskJoin {
                task: "watch_cycle",
                reason: err.to_string(),
            })?;
            watcher = returned;
            summary.cycles += 1;

            match outcome {
                Ok(report) => {
                    for event in &report.events {
                        event.log();
                    }
                    for failure in &report.failures {
                        log_scan_failure(failure);
                    }
                    summary.matches += report.match_count() as u64;
                }
                Err(err) => {
                    summary.failed_cycles += 1;
                    tracing::error!(
                        event = "cycle_error",
                        directory = %err.path().display(),
                        reason = %err,
                        "watch cycle failed; retrying next poll",
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_rx.recv() => break,
            }
        }

        summary.uptime = format_uptime(started_at.elapsed());
        tracing::info!(
            event = "shutdown",
            uptime = %summary.uptime,
            cycles = summary.cycles,
            "{}",
            stopping_banner(&summary.uptime),
        );
        Ok(summary)
    }
}

fn shutdown_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty))
}

fn log_scan_failure(failure: &WatchError) {
    tracing::warn!(
        event = "scan_error",
        path = %failure.path().display(),
        reason = %failure,
        "skipping file this cycle",
    );
}

/// Build a runtime, wire SIGINT/SIGTERM to shutdown, and run the poll loop
/// until a signal arrives.
pub fn start_blocking(
    config: &WatchConfig,
    started_at: Instant,
) -> Result<LoopSummary, DaemonError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config, started_at))
}

async fn run(config: &WatchConfig, started_at: Instant) -> Result<LoopSummary, DaemonError> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(4);

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let result = wait_for_signal().await;
            if let Ok(signal) = &result {
                tracing::warn!(signal = *signal, "received signal, shutting down");
            }
            let _ = shutdown.send(());
            result.map(|_| ())
        })
    };

    let now = Local::now();
    tracing::info!("{}", starting_banner(now));
    tracing::info!(
        event = "startup",
        timestamp = %now.to_rfc3339(),
        directory = %config.directory.display(),
        marker = %config.marker,
        extension = %config.extension,
        interval_secs = config.interval.as_secs(),
        "watching directory",
    );

    let poll = PollLoop::new(DirWatcher::from_config(config), config.interval, started_at);
    let summary = poll.run(shutdown_rx).await;

    // The loop may stop without a signal (channel closed, join failure).
    signal_handle.abort();
    let signal_result = signal_handle.await;
    let summary = summary?;
    match signal_result {
        Ok(Err(err)) => Err(err),
        Err(err) if err.is_panic() => Err(DaemonError::TaskJoin {
            task: "signal_handler",
            reason: err.to_string(),
        }),
        _ => Ok(summary),
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str, DaemonError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).map_err(DaemonError::Signal)?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT").map_err(DaemonError::Signal),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str, DaemonError> {
    tokio::signal::ctrl_c().await.map_err(DaemonError::Signal)?;
    Ok("ctrl-c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use dirwatch_core::ExtensionFilter;
    use tempfile::TempDir;
    use tokio::time::timeout;

    fn poll_loop(dir: &Path, interval: Duration) -> PollLoop {
        let watcher = DirWatcher::new(dir, "XMAGICX", ExtensionFilter::new("log"));
        PollLoop::new(watcher, interval, Instant::now())
    }

    #[tokio::test]
    async fn pending_shutdown_stops_before_any_cycle() {
        let dir = TempDir::new().expect("tempdir");
        let (tx, rx) = broadcast::channel(1);
        tx.send(()).expect("send shutdown");

        let summary = poll_loop(dir.path(), Duration::from_secs(60))
            .run(rx)
            .await
            .expect("loop");
        assert_eq!(summary.cycles, 0);
        assert_eq!(summary.uptime, "0:00:00");
    }

    #[tokio::test]
    async fn shutdown_interrupts_a_long_sleep() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("a.log"), "start\nXMAGICX\nend\n").expect("write");
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(poll_loop(dir.path(), Duration::from_secs(3600)).run(rx));
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(()).expect("send shutdown");

        let summary = timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop should stop promptly")
            .expect("join")
            .expect("loop");
        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.failed_cycles, 0);
        assert_eq!(summary.matches, 1);
    }

    #[tokio::test]
    async fn missing_directory_is_retried_not_fatal() {
        let parent = TempDir::new().expect("tempdir");
        let dir = parent.path().join("later");
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(poll_loop(&dir, Duration::from_millis(20)).run(rx));
        tokio::time::sleep(Duration::from_millis(200)).await;
        fs::create_dir(&dir).expect("mkdir");
        fs::write(dir.join("a.log"), "XMAGICX\n").expect("write");
        tokio::time::sleep(Duration::from_millis(300)).await;
        tx.send(()).expect("send shutdown");

        let summary = timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop should stop promptly")
            .expect("join")
            .expect("loop");
        assert!(summary.failed_cycles >= 1, "summary: {summary:?}");
        assert!(summary.cycles > summary.failed_cycles, "summary: {summary:?}");
        assert_eq!(summary.matches, 1, "match must be reported exactly once");
    }

    #[tokio::test]
    async fn closed_channel_counts_as_shutdown() {
        let dir = TempDir::new().expect("tempdir");
        let (tx, rx) = broadcast::channel::<()>(1);
        drop(tx);

        let summary = timeout(
            Duration::from_secs(5),
            poll_loop(dir.path(), Duration::from_secs(3600)).run(rx),
        )
        .await
        .expect("loop should stop promptly")
        .expect("loop");
        assert_eq!(summary.cycles, 0);
    }
}
