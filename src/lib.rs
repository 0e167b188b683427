pub mod config;
pub mod event_logger;
pub mod events;
pub mod history;
#[cfg(unix)]
pub mod ipc;
pub mod json_logger;
#[cfg(feature = "cplugin")]
pub mod mpv;
pub mod record;

pub use crate::config::HistoryConfig;
pub use crate::event_logger::EventLogger;
pub use crate::events::{EventSource, MetadataSource, PlayerEvent};
pub use crate::record::HistoryRecord;
