//! Configuration for hnfeed.
//!
//! Configuration is read from `~/.config/hnfeed/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coordinator::{
    CoordinatorSettings, DEFAULT_RELOAD_TIMEOUT, DEFAULT_TITLE_MAX_CHARS,
    DEFAULT_TOP_STORIES_LIMIT,
};
use crate::fetcher::fanout::DEFAULT_WORKERS;
use crate::fetcher::http_client::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::filter::DEFAULT_DEBOUNCE;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub filter: FilterConfig,
    pub headline: HeadlineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the Hacker News API; item and list paths are joined onto it.
    pub api_base_url: String,
    pub top_stories_limit: usize,
    /// Interval between background reloads, e.g. "1h", "30m".
    pub reload_interval: String,
    pub reload_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// 0 = unbounded
    pub max_concurrent_fetches: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            top_stories_limit: DEFAULT_TOP_STORIES_LIMIT,
            reload_interval: "1h".to_string(),
            reload_timeout_secs: DEFAULT_RELOAD_TIMEOUT.as_secs(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            max_concurrent_fetches: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub debounce_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadlineConfig {
    pub max_title_chars: usize,
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        Self {
            max_title_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/hnfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("hnfeed").join("config.toml"))
    }

    /// Coordinator settings derived from the `[feed]`, `[filter]` and
    /// `[headline]` sections.
    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            top_stories_limit: self.feed.top_stories_limit,
            reload_timeout: Duration::from_secs(self.feed.reload_timeout_secs),
            debounce: Duration::from_millis(self.filter.debounce_ms),
            title_max_chars: self.headline.max_title_chars,
            workers: self.feed.max_concurrent_fetches,
        }
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Wrote default config to {}", path.display());
        Ok(())
    }

    fn default_config_content() -> String {
        r##"# hnfeed configuration
#
# Intervals accept a number with a unit suffix: "90s", "30m", "1h", "1d".

[feed]
# Hacker News API root
api_base_url = "https://hacker-news.firebaseio.com/v0/"

# How many top stories to fetch on each reload
top_stories_limit = 500

# How often `hnfeed run` reloads the feed
reload_interval = "1h"

# A reload that takes longer than this is abandoned
reload_timeout_secs = 60

# Per-request HTTP timeout
request_timeout_secs = 10

# Maximum concurrent story requests (0 = no limit)
max_concurrent_fetches = 0

[filter]
# Delay before a search query is applied
debounce_ms = 500

[headline]
# Longest headline shown before it is cut with an ellipsis
max_title_chars = 40
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
