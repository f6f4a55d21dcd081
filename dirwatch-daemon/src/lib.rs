//! Poll loop runtime: repeated watch cycles, signal-driven shutdown, logging setup.

pub mod banner;
mod error;
mod runtime;
pub mod telemetry;
pub mod uptime;

pub use error::DaemonError;
pub use runtime::{start_blocking, LoopSummary, PollLoop};
pub use telemetry::{init_tracing, LogFormat};
pub use uptime::format_uptime;
