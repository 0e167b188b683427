//! Out-of-process host: mpv's JSON IPC socket (`--input-ipc-server`).
//!
//! The protocol is line-delimited JSON. Commands carry a `request_id`, and
//! replies echo it back. Events can arrive at any time, including between a
//! command and its reply, so events read while waiting for a reply are queued.

use crate::events::{EventSource, MetadataSource, PlayerEvent};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mpv closed the IPC connection")]
    Disconnected,
}

#[derive(Debug, Serialize)]
struct IpcCommand<'a> {
    command: [&'a str; 2],
    request_id: u64,
}

#[derive(Debug, Deserialize)]
struct IpcMessage {
    event: Option<String>,
    request_id: Option<u64>,
    error: Option<String>,
    data: Option<serde_json::Value>,
}

pub struct IpcClient<R, W> {
    reader: R,
    writer: W,
    pending_events: VecDeque<PlayerEvent>,
    next_request_id: u64,
    closed: bool,
}

impl IpcClient<BufReader<UnixStream>, UnixStream> {
    /// Connect to a running mpv's IPC socket
    pub fn connect<P: AsRef<Path>>(socket: P) -> Result<Self, IpcError> {
        let stream = UnixStream::connect(socket.as_ref())?;
        let reader = BufReader::new(stream.try_clone()?);
        log::info!("Connected to mpv at {}", socket.as_ref().display());
        Ok(Self::new(reader, stream))
    }
}

impl<R: BufRead, W: Write> IpcClient<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            pending_events: VecDeque::new(),
            next_request_id: 1,
            closed: false,
        }
    }

    /// Fetch a property as a string. Properties mpv reports as unavailable,
    /// or whose value is not a string, come back as `None`.
    pub fn get_property(&mut self, name: &str) -> Result<Option<String>, IpcError> {
        if self.closed {
            return Err(IpcError::Disconnected);
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let mut line = serde_json::to_string(&IpcCommand {
            command: ["get_property", name],
            request_id,
        })?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        loop {
            let Some(message) = self.read_message()? else {
                self.closed = true;
                return Err(IpcError::Disconnected);
            };

            if let Some(event) = message.event {
                self.pending_events.push_back(PlayerEvent::from_name(&event));
                continue;
            }

            if message.request_id != Some(request_id) {
                log::trace!("Ignoring reply to request {:?}", message.request_id);
                continue;
            }

            return match message.error.as_deref() {
                Some("success") => Ok(message
                    .data
                    .as_ref()
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)),
                other => {
                    log::debug!("Property {name} unavailable: {}", other.unwrap_or("no status"));
                    Ok(None)
                }
            };
        }
    }

    /// Read the next well-formed message. `None` at end of stream.
    fn read_message(&mut self) -> Result<Option<IpcMessage>, IpcError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => log::warn!("Skipping malformed IPC message: {e}"),
            }
        }
    }
}

impl<R: BufRead, W: Write> EventSource for IpcClient<R, W> {
    fn next_event(&mut self) -> Option<PlayerEvent> {
        if let Some(event) = self.pending_events.pop_front() {
            return Some(event);
        }
        if self.closed {
            return None;
        }

        loop {
            match self.read_message() {
                Ok(Some(IpcMessage {
                    event: Some(event), ..
                })) => return Some(PlayerEvent::from_name(&event)),
                Ok(Some(_)) => continue,
                Ok(None) => {
                    self.closed = true;
                    return None;
                }
                Err(e) => {
                    log::warn!("Lost connection to mpv: {e}");
                    self.closed = true;
                    return None;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> MetadataSource for IpcClient<R, W> {
    fn property(&mut self, name: &str) -> Option<String> {
        match self.get_property(name) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to query {name} from mpv: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn client(input: &str) -> IpcClient<Cursor<Vec<u8>>, Vec<u8>> {
        IpcClient::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test_log::test]
    fn test_events_in_order_then_end_of_stream() {
        let mut client = client(
            "{\"event\":\"start-file\",\"playlist_entry_id\":1}\n\
             \n\
             garbage\n\
             {\"event\":\"file-loaded\"}\n\
             {\"event\":\"shutdown\"}\n",
        );

        assert_eq!(client.next_event(), Some(PlayerEvent::StartFile));
        assert_eq!(client.next_event(), Some(PlayerEvent::FileLoaded));
        assert_eq!(client.next_event(), Some(PlayerEvent::Shutdown));
        assert_eq!(client.next_event(), None);
        assert_eq!(client.next_event(), None);
    }

    #[test_log::test]
    fn test_get_property_writes_command_and_reads_reply() {
        let mut client = client("{\"request_id\":1,\"error\":\"success\",\"data\":\"/media/a.mkv\"}\n");

        let value = client.get_property("path").unwrap();

        assert_eq!(value.as_deref(), Some("/media/a.mkv"));
        assert_eq!(
            String::from_utf8(client.writer.clone()).unwrap(),
            "{\"command\":[\"get_property\",\"path\"],\"request_id\":1}\n"
        );
    }

    #[test_log::test]
    fn test_events_during_reply_are_queued() {
        let mut client = client(
            "{\"event\":\"playback-restart\"}\n\
             {\"request_id\":7,\"error\":\"success\",\"data\":\"stale\"}\n\
             {\"event\":\"end-file\"}\n\
             {\"request_id\":1,\"error\":\"success\",\"data\":\"Title\"}\n",
        );

        assert_eq!(client.get_property("media-title").unwrap().as_deref(), Some("Title"));
        assert_eq!(
            client.next_event(),
            Some(PlayerEvent::Other("playback-restart".to_string()))
        );
        assert_eq!(client.next_event(), Some(PlayerEvent::EndFile));
        assert_eq!(client.next_event(), None);
    }

    #[test_log::test]
    fn test_unavailable_or_non_string_property_is_none() {
        let mut client = client(
            "{\"request_id\":1,\"error\":\"property unavailable\"}\n\
             {\"request_id\":2,\"error\":\"success\",\"data\":42}\n",
        );

        assert_eq!(client.property("media-title"), None);
        assert_eq!(client.property("path"), None);
        // connection is gone now: the query fails and degrades to None
        assert_eq!(client.property("path"), None);
        assert!(matches!(
            client.get_property("path"),
            Err(IpcError::Disconnected)
        ));
    }
}
