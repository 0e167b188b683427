//! Reading watch history back from the JSON Lines file.

use crate::record::HistoryRecord;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// How many entries the history view shows by default
pub const RECENT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum HistoryReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Return up to `limit` records, most recently appended first.
///
/// A missing file is an empty history. Lines that do not parse (including
/// lines with raw control characters or invalid UTF-8) are skipped.
pub fn read_recent(path: &Path, limit: usize) -> Result<Vec<HistoryRecord>, HistoryReadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut recent = VecDeque::with_capacity(limit.min(RECENT_HISTORY_LIMIT));
    let mut line = Vec::new();
    let mut line_number = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        line_number += 1;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        // Raw bytes: the history may hold paths that are not valid UTF-8.
        match serde_json::from_slice::<HistoryRecord>(&line) {
            Ok(record) => {
                if recent.len() == limit {
                    recent.pop_front();
                }
                if limit > 0 {
                    recent.push_back(record);
                }
            }
            Err(e) => log::warn!(
                "Skipping malformed history line {line_number} in {}: {e}",
                path.display()
            ),
        }
    }

    Ok(recent.into_iter().rev().collect())
}
