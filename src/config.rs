//! Configuration.
//!
//! One [`AppConfig`] value is built in `main` (TOML file, then environment
//! overrides) and handed to the logger and session constructors.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::FeedKind;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "FEEDTERM_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Event log settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Records buffered in memory before a flush
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Records per file before it is rotated aside
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Rotated files kept on disk
    #[serde(default = "default_max_rotation_files")]
    pub max_rotation_files: usize,
}

fn default_log_enabled() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("feedterm").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./feedterm_logs"))
}

fn default_buffer_size() -> usize {
    5
}

fn default_max_entries() -> usize {
    1000
}

fn default_max_rotation_files() -> usize {
    5
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            dir: default_log_dir(),
            buffer_size: default_buffer_size(),
            max_entries: default_max_entries(),
            max_rotation_files: default_max_rotation_files(),
        }
    }
}

impl LogConfig {
    /// Default settings writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_max_rotation_files(mut self, max_rotation_files: usize) -> Self {
        self.max_rotation_files = max_rotation_files;
        self
    }
}

/// Streaming session settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamConfig {
    #[serde(default)]
    pub default_feed: FeedKind,

    /// EventBus capacity
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Posts kept in the timeline view
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_event_buffer() -> usize {
    crate::bus::DEFAULT_CAPACITY
}

fn default_max_posts() -> usize {
    100
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            default_feed: FeedKind::default(),
            event_buffer: default_event_buffer(),
            max_posts: default_max_posts(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl StreamConfig {
    pub fn with_default_feed(mut self, feed: FeedKind) -> Self {
        self.default_feed = feed;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// REST client settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_http_timeout() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `$FEEDTERM_CONFIG` or the default location, apply
    /// environment overrides and validate.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path()?;
        let mut config = Self::load(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FEEDTERM_LOG_DIR`, `FEEDTERM_LOG_DISABLED` and `FEEDTERM_DEFAULT_FEED`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(dir) = std::env::var("FEEDTERM_LOG_DIR") {
            if !dir.is_empty() {
                self.log.dir = PathBuf::from(dir);
            }
        }
        if let Ok(value) = std::env::var("FEEDTERM_LOG_DISABLED") {
            if matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                self.log.enabled = false;
            }
        }
        if let Ok(feed) = std::env::var("FEEDTERM_DEFAULT_FEED") {
            self.stream.default_feed = feed.parse().map_err(|reason| ConfigError::Invalid {
                field: "FEEDTERM_DEFAULT_FEED",
                reason,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("log.buffer_size", self.log.buffer_size),
            ("log.max_entries", self.log.max_entries),
            ("log.max_rotation_files", self.log.max_rotation_files),
            ("stream.event_buffer", self.stream.event_buffer),
            ("stream.max_posts", self.stream.max_posts),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// `$FEEDTERM_CONFIG`, else `<config_dir>/feedterm/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    config_dir().map(|dir| dir.join("config.toml"))
}

/// `<config_dir>/feedterm`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|p| p.join("feedterm"))
        .ok_or(ConfigError::NoConfigDirectory)
}
