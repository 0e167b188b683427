//! Diagnostics emitted through the `log` facade.
//!
//! Lives in its own test binary: `testing_logger` installs the global logger,
//! which would clash with the `env_logger` that `test-log` sets up elsewhere.

use cineindex_history::config::{HistoryConfig, HistoryConfigError};
use cineindex_history::history::read_recent;
use cineindex_history::{EventLogger, MetadataSource};
use log::Level;
use std::cell::RefCell;
use std::fs::{self, OpenOptions};

struct NowPlaying;

impl MetadataSource for NowPlaying {
    fn property(&mut self, name: &str) -> Option<String> {
        match name {
            "path" => Some("/media/movie.mkv".to_string()),
            "media-title" => Some("Movie".to_string()),
            _ => None,
        }
    }
}

/// Drain the records captured on this thread since `setup`
fn captured() -> Vec<(Level, String)> {
    let records = RefCell::new(Vec::new());
    testing_logger::validate(|logs| {
        *records.borrow_mut() = logs.iter().map(|log| (log.level, log.body.clone())).collect();
    });
    records.into_inner()
}

fn at(records: &[(Level, String)], level: Level) -> Vec<String> {
    records
        .iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, body)| body.clone())
        .collect()
}

#[test]
fn test_disabled_logger_reports_one_error() {
    testing_logger::setup();

    assert!(EventLogger::init(Err(HistoryConfigError::Missing)).is_none());

    let errors = at(&captured(), Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("CINEINDEX_HISTORY_FILE is not set"));
}

#[test]
fn test_enabled_logger_names_destination() {
    testing_logger::setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hist.jsonl");

    assert!(EventLogger::init(Ok(HistoryConfig::new(&path))).is_some());

    let infos = at(&captured(), Level::Info);
    assert_eq!(infos.len(), 1);
    assert!(infos[0].contains(&path.display().to_string()));
}

#[test]
fn test_failed_append_warns_once_per_event() {
    testing_logger::setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("hist.jsonl");
    let io_error = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .unwrap_err()
        .to_string();

    let logger = EventLogger::new(HistoryConfig::new(&path));
    logger.handle_file_loaded(&mut NowPlaying);
    logger.handle_file_loaded(&mut NowPlaying);

    let warnings = at(&captured(), Level::Warn);
    assert_eq!(warnings.len(), 2);
    for warning in &warnings {
        assert!(warning.contains(&io_error), "unexpected warning: {warning}");
        assert!(warning.contains(&path.display().to_string()));
    }
    assert!(!path.exists());
}

#[test]
fn test_successful_append_is_quiet() {
    testing_logger::setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hist.jsonl");

    EventLogger::new(HistoryConfig::new(&path)).handle_file_loaded(&mut NowPlaying);

    let records = captured();
    assert!(at(&records, Level::Warn).is_empty());
    assert!(at(&records, Level::Error).is_empty());
    assert_eq!(at(&records, Level::Trace).len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[test]
fn test_malformed_history_line_warns() {
    testing_logger::setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hist.jsonl");
    fs::write(
        &path,
        b"{\"Name\":\"ok\",\"Url\":\"\",\"Time\":\"2024-01-15 20:30:00\"}\n{\"Name\":\"\xff\"}\n",
    )
    .unwrap();

    let history = read_recent(&path, 50).unwrap();

    assert_eq!(history.len(), 1);
    let warnings = at(&captured(), Level::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("line 2"));
}
