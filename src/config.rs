use config::{Config, ConfigError, Environment, Map};
use std::path::PathBuf;

/// Environment variable holding the destination history file
pub const HISTORY_FILE_ENV: &str = "CINEINDEX_HISTORY_FILE";

const ENV_PREFIX: &str = "CINEINDEX";
const HISTORY_FILE_KEY: &str = "history_file";

#[derive(Debug, thiserror::Error)]
pub enum HistoryConfigError {
    #[error("{} is not set", HISTORY_FILE_ENV)]
    Missing,
    #[error("{} is empty", HISTORY_FILE_ENV)]
    Empty,
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Where watch history gets appended. Read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub history_file: PathBuf,
}

impl HistoryConfig {
    pub fn new(history_file: impl Into<PathBuf>) -> Self {
        Self {
            history_file: history_file.into(),
        }
    }

    /// Load configuration from the process environment
    pub fn load() -> Result<Self, HistoryConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit variable map, falling back to the
    /// process environment when `vars` is `None`
    pub fn load_from(vars: Option<Map<String, String>>) -> Result<Self, HistoryConfigError> {
        let settings = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).source(vars))
            .build()?;

        let history_file = match settings.get_string(HISTORY_FILE_KEY) {
            Ok(value) => value,
            Err(ConfigError::NotFound(_)) => return Err(HistoryConfigError::Missing),
            Err(e) => return Err(e.into()),
        };

        if history_file.is_empty() {
            return Err(HistoryConfigError::Empty);
        }

        Ok(Self::new(history_file))
    }

    /// Load configuration, letting an explicit path (e.g. from the command
    /// line) take priority over the environment
    pub fn load_with_override(path: Option<PathBuf>) -> Result<Self, HistoryConfigError> {
        match path {
            Some(path) if path.as_os_str().is_empty() => Err(HistoryConfigError::Empty),
            Some(path) => Ok(Self::new(path)),
            None => Self::load(),
        }
    }
}
