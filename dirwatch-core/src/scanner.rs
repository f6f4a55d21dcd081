//! Incremental marker scan over tracked files.
//!
//! Each file is read as a stream of lines ended by `\n`, `\r\n` or a lone
//! `\r`. Lines before the file's stored progress are counted but not decoded;
//! the rest are tested for the marker with a case-sensitive substring check.
//! After a file is read its progress is set to the number of complete lines
//! seen, so unchanged files produce no matches on the next pass. A trailing
//! line with no terminator yet is left for a later pass.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{file_err, WatchError};
use crate::events::WatchEvent;
use crate::state::StateTable;

/// Result of scanning one file from a given line onwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// 1-based line numbers containing the marker.
    pub matched_lines: Vec<usize>,
    /// Complete (terminated) lines currently in the file.
    pub line_count: usize,
}

/// Line splitter accepting `\n`, `\r\n` and a lone `\r` as terminators.
///
/// Yields each line without its terminator, flagged with whether a terminator
/// was present. Only the final line of the stream can be unterminated.
struct UniversalLines<R> {
    reader: R,
    pending: VecDeque<(Vec<u8>, bool)>,
}

impl<R: BufRead> UniversalLines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> Iterator for UniversalLines<R> {
    type Item = io::Result<(Vec<u8>, bool)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.pop_front() {
            return Some(Ok(line));
        }

        let mut chunk = Vec::new();
        match self.reader.read_until(b'\n', &mut chunk) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => return Some(Err(err)),
        }

        let newline = chunk.last() == Some(&b'\n');
        if newline {
            chunk.pop();
            if chunk.last() == Some(&b'\r') {
                chunk.pop();
            }
        }

        // Any `\r` left in the chunk is a lone terminator.
        let mut segments: Vec<&[u8]> = chunk.split(|&b| b == b'\r').collect();
        let last = segments.pop().unwrap_or_default();
        self.pending
            .extend(segments.into_iter().map(|segment| (segment.to_vec(), true)));
        if newline || !last.is_empty() {
            self.pending.push_back((last.to_vec(), newline));
        }
        self.pending.pop_front().map(Ok)
    }
}

/// Everything produced by one pass over the [`StateTable`].
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub events: Vec<WatchEvent>,
    /// Per-file failures. These never stop the remaining files from being scanned.
    pub failures: Vec<WatchError>,
}

/// Scan `path` for `marker`, testing only lines at index `from` and later.
pub fn scan_file(path: &Path, from: usize, marker: &str) -> Result<FileScan, WatchError> {
    let file = File::open(path).map_err(|e| file_err(path, e))?;
    let mut scan = FileScan::default();

    for (index, line) in UniversalLines::new(BufReader::new(file)).enumerate() {
        let (line, terminated) = line.map_err(|e| file_err(path, e))?;
        if !terminated {
            break;
        }
        scan.line_count = index + 1;
        if index < from {
            continue;
        }
        if String::from_utf8_lossy(&line).contains(marker) {
            scan.matched_lines.push(index + 1);
        }
    }

    Ok(scan)
}

/// Scan every tracked file and advance its progress.
///
/// A file that now has fewer lines than already scanned is treated as
/// rewritten: a [`WatchEvent::FileTruncated`] is reported and the file is
/// scanned again from its first line.
pub fn scan_all(state: &mut StateTable, marker: &str) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let tracked: Vec<(PathBuf, usize)> = state
        .entries()
        .map(|(path, line)| (path.clone(), line))
        .collect();

    for (path, from) in tracked {
        match scan_tracked(&path, from, marker, &mut outcome.events) {
            Ok(next_line) => state.advance(&path, next_line),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "skipping unreadable file");
                outcome.failures.push(err);
            }
        }
    }

    outcome
}

fn scan_tracked(
    path: &Path,
    from: usize,
    marker: &str,
    events: &mut Vec<WatchEvent>,
) -> Result<usize, WatchError> {
    let mut scan = scan_file(path, from, marker)?;
    if scan.line_count < from {
        events.push(WatchEvent::FileTruncated {
            path: path.to_path_buf(),
            previous_lines: from,
            current_lines: scan.line_count,
        });
        scan = scan_file(path, 0, marker)?;
    }

    events.extend(scan.matched_lines.iter().map(|&line| WatchEvent::MatchFound {
        path: path.to_path_buf(),
        line,
        marker: marker.to_string(),
    }));
    Ok(scan.line_count)
}
