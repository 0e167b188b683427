use crate::record::HistoryRecord;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum JsonLoggerError {
    #[error("cannot open {path} for appending: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Appends history records to a JSON Lines file.
///
/// The file is opened, written and closed for every record; no handle is
/// kept between calls, so external rotation between events is harmless.
#[derive(Debug, Clone)]
pub struct JsonLogger {
    log_file_path: PathBuf,
}

impl JsonLogger {
    pub fn new(log_file_path: impl Into<PathBuf>) -> Self {
        Self {
            log_file_path: log_file_path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log_file_path
    }

    /// Append one record, creating the file if it does not exist
    pub fn log_record(&self, record: &HistoryRecord) -> Result<(), JsonLoggerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .map_err(|source| JsonLoggerError::Open {
                path: self.log_file_path.clone(),
                source,
            })?;

        // One write call per line keeps appends from separate processes whole.
        file.write_all(record.to_json_line().as_bytes())
            .map_err(|source| JsonLoggerError::Write {
                path: self.log_file_path.clone(),
                source,
            })?;

        log::trace!("Logged history record to {}", self.log_file_path.display());
        Ok(())
    }
}
