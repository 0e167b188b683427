/// Property holding the path or URL of the current item
pub const PROPERTY_PATH: &str = "path";
/// Property holding the display title of the current item
pub const PROPERTY_MEDIA_TITLE: &str = "media-title";

/// `mpv_event_id` values of the events below
pub const MPV_EVENT_SHUTDOWN: i32 = 1;
pub const MPV_EVENT_START_FILE: i32 = 6;
pub const MPV_EVENT_END_FILE: i32 = 7;
pub const MPV_EVENT_FILE_LOADED: i32 = 8;

/// Player events the history logger distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A new item is about to be opened; metadata is not available yet
    StartFile,
    /// The new item is open and its metadata can be queried
    FileLoaded,
    /// Playback of the current item ended
    EndFile,
    /// The player is shutting down
    Shutdown,
    /// Any other player event, by name
    Other(String),
}

impl PlayerEvent {
    /// Map an mpv event name (as used by the client API and JSON IPC)
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "start-file" => PlayerEvent::StartFile,
            "file-loaded" => PlayerEvent::FileLoaded,
            "end-file" => PlayerEvent::EndFile,
            "shutdown" => PlayerEvent::Shutdown,
            other => PlayerEvent::Other(other.to_string()),
        }
    }

    /// Map an `mpv_event_id` from the client API. Ids without a dedicated
    /// variant return `None`; the caller names them via `mpv_event_name`.
    #[must_use]
    pub fn from_mpv_id(event_id: i32) -> Option<Self> {
        match event_id {
            MPV_EVENT_SHUTDOWN => Some(PlayerEvent::Shutdown),
            MPV_EVENT_START_FILE => Some(PlayerEvent::StartFile),
            MPV_EVENT_END_FILE => Some(PlayerEvent::EndFile),
            MPV_EVENT_FILE_LOADED => Some(PlayerEvent::FileLoaded),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerEvent::StartFile => write!(f, "start-file"),
            PlayerEvent::FileLoaded => write!(f, "file-loaded"),
            PlayerEvent::EndFile => write!(f, "end-file"),
            PlayerEvent::Shutdown => write!(f, "shutdown"),
            PlayerEvent::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Blocking source of player events
pub trait EventSource {
    /// Wait for the next event. `None` means the player went away.
    fn next_event(&mut self) -> Option<PlayerEvent>;
}

/// Read access to the player's properties
pub trait MetadataSource {
    /// Query a string property. Unavailable properties yield `None`.
    fn property(&mut self, name: &str) -> Option<String>;

    fn media_path(&mut self) -> Option<String> {
        self.property(PROPERTY_PATH)
    }

    fn media_title(&mut self) -> Option<String> {
        self.property(PROPERTY_MEDIA_TITLE)
    }
}
