//! Dirwatcher — poll a directory and report lines containing a marker text.
//!
//! # Usage
//!
//! ```text
//! dirwatcher -d <dir> -t <text> -e <ext> [-i [<seconds>]] [--log-format text|json] [--once]
//! ```

mod watch;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use watch::WatchArgs;

fn main() -> ExitCode {
    let started_at = Instant::now();
    let args = WatchArgs::parse();
    match args.run(started_at) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
