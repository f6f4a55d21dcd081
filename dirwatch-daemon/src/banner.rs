//! Start and stop banners written to the log.

use chrono::{DateTime, Local};

const RULE_WIDTH: usize = 70;

pub fn starting_banner(started_at: DateTime<Local>) -> String {
    framed(&format!(
        "dirwatcher started at {}",
        started_at.format("%a %b %e %H:%M:%S %Y")
    ))
}

pub fn stopping_banner(uptime: &str) -> String {
    framed(&format!("stopped dirwatcher\n\tuptime: {uptime}"))
}

fn framed(body: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!("\n{rule}\n\n\t{body}\n\n{rule}\n")
}
