use crate::config::{HistoryConfig, HistoryConfigError};
use crate::events::{EventSource, MetadataSource, PlayerEvent};
use crate::json_logger::JsonLogger;
use crate::record::HistoryRecord;

/// Event-driven watch-history logger.
///
/// Only exists when a destination path is configured; see [`EventLogger::init`].
pub struct EventLogger {
    json_logger: JsonLogger,
}

impl EventLogger {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            json_logger: JsonLogger::new(config.history_file),
        }
    }

    /// Decide once, at load time, whether history logging is active.
    ///
    /// A missing or empty destination disables the logger for the rest of
    /// the process: the error is reported and `None` is returned, so the
    /// caller never subscribes to any events.
    pub fn init(config: Result<HistoryConfig, HistoryConfigError>) -> Option<Self> {
        match config {
            Ok(config) => {
                log::info!(
                    "Logging watch history to {}",
                    config.history_file.display()
                );
                Some(Self::new(config))
            }
            Err(e) => {
                log::error!("Watch history disabled: {e}");
                None
            }
        }
    }

    /// Consume player events until the player shuts down
    pub fn run<H>(&self, host: &mut H)
    where
        H: EventSource + MetadataSource,
    {
        while let Some(event) = host.next_event() {
            match event {
                PlayerEvent::FileLoaded => self.handle_file_loaded(host),
                PlayerEvent::Shutdown => break,
                other => log::trace!("Ignoring player event {other}"),
            }
        }
        log::debug!("Player event stream ended");
    }

    /// Record the item that just started playing.
    ///
    /// Never fails: missing metadata becomes an empty field and a failed
    /// append is reported as a warning, dropping this one record.
    pub fn handle_file_loaded<M>(&self, metadata: &mut M)
    where
        M: MetadataSource + ?Sized,
    {
        let url = metadata.media_path().unwrap_or_default();
        let name = metadata.media_title().unwrap_or_default();
        let record = HistoryRecord::now(name, url);

        if let Err(e) = self.json_logger.log_record(&record) {
            log::warn!("Failed to log watch history: {e}");
        }
    }
}
