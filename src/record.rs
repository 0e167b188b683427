use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of the `Time` field, local wall clock without timezone
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One watch-history entry, written as a single JSON line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoryRecord {
    /// Display title of the played item
    pub name: String,
    /// Path or URL of the played item
    pub url: String,
    /// Local time the item started playing, formatted with [`TIME_FORMAT`]
    pub time: String,
}

impl HistoryRecord {
    /// Create a record stamped with the current local time
    pub fn now(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::at(name, url, Local::now().naive_local())
    }

    pub fn at(name: impl Into<String>, url: impl Into<String>, time: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            time: time.format(TIME_FORMAT).to_string(),
        }
    }

    /// Parse the `Time` field back into a timestamp
    #[must_use]
    pub fn played_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, TIME_FORMAT).ok()
    }

    /// Render the record as one JSON Lines entry, trailing newline included.
    ///
    /// Field order is fixed (`Name`, `Url`, `Time`) and strings go through
    /// [`escape_json_str`], not a full JSON encoder. Consumers of the history
    /// file rely on this exact shape.
    #[must_use]
    pub fn to_json_line(&self) -> String {
        format!(
            "{{\"Name\":\"{}\",\"Url\":\"{}\",\"Time\":\"{}\"}}\n",
            escape_json_str(&self.name),
            escape_json_str(&self.url),
            escape_json_str(&self.time),
        )
    }
}

/// Escape a string for embedding in a JSON string literal.
///
/// Only backslash, double quote, newline and carriage return are escaped.
/// Tabs and other control characters pass through untouched, so a title
/// containing them yields a line strict JSON parsers reject.
#[must_use]
pub fn escape_json_str(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
