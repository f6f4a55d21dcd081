use std::time::Duration;

/// Render elapsed runtime as `H:MM:SS`. Hours keep counting past 24.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
