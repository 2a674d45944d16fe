//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Content provider and HTTP behavior settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Channel metadata and excerpt settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Output and state file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Daemon refresh interval bounds
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// HTTP server settings for serve mode
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.provider.user_agent.trim().is_empty() {
            return Err(AppError::validation("provider.user_agent is empty"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(AppError::validation("provider.base_url is empty"));
        }
        url::Url::parse(&self.provider.base_url)?;
        if self.provider.timeout_secs == 0 {
            return Err(AppError::validation("provider.timeout_secs must be > 0"));
        }
        if self.provider.max_concurrent == 0 {
            return Err(AppError::validation("provider.max_concurrent must be > 0"));
        }
        if self.provider.limit == 0 {
            return Err(AppError::validation("--limit must be greater than zero"));
        }
        if self.provider.top_days == 0 {
            return Err(AppError::validation("--top-days must be greater than zero"));
        }
        if self.feed.max_paragraphs == 0 {
            return Err(AppError::validation("feed.max_paragraphs must be > 0"));
        }
        if self.schedule.min_interval_secs == 0 || self.schedule.max_interval_secs == 0 {
            return Err(AppError::validation("Intervals must be positive seconds"));
        }
        if self.schedule.min_interval_secs > self.schedule.max_interval_secs {
            return Err(AppError::validation(
                "--min-interval cannot exceed --max-interval",
            ));
        }
        if self.server.port == 0 {
            return Err(AppError::validation("--port must be a positive integer"));
        }
        Ok(())
    }
}

/// Content provider and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API root, without trailing slash
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// How many times a rate-limited request is retried
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Backoff unit when no Retry-After header is given
    #[serde(default = "defaults::retry_base_delay")]
    pub retry_base_delay_ms: u64,

    /// Upper bound of the random jitter added to each backoff
    #[serde(default = "defaults::retry_jitter")]
    pub retry_jitter_ms: u64,

    /// Cap on a single retry delay, whatever Retry-After asks for
    #[serde(default = "defaults::max_retry_after")]
    pub max_retry_after_secs: u64,

    /// Maximum concurrent article body requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Number of top articles to include
    #[serde(default = "defaults::limit")]
    pub limit: usize,

    /// Day-window used for the top ranking
    #[serde(default = "defaults::top_days")]
    pub top_days: u32,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            retry_base_delay_ms: defaults::retry_base_delay(),
            retry_jitter_ms: defaults::retry_jitter(),
            max_retry_after_secs: defaults::max_retry_after(),
            max_concurrent: defaults::max_concurrent(),
            limit: defaults::limit(),
            top_days: defaults::top_days(),
        }
    }
}

/// Channel metadata and excerpt shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "defaults::feed_title")]
    pub title: String,

    #[serde(default = "defaults::feed_link")]
    pub link: String,

    #[serde(default = "defaults::feed_description")]
    pub description: String,

    /// Paragraphs kept from each article body
    #[serde(default = "defaults::max_paragraphs")]
    pub max_paragraphs: usize,

    /// Grapheme clusters kept from each paragraph
    #[serde(default = "defaults::max_paragraph_chars")]
    pub max_paragraph_chars: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: defaults::feed_title(),
            link: defaults::feed_link(),
            description: defaults::feed_description(),
            max_paragraphs: defaults::max_paragraphs(),
            max_paragraph_chars: defaults::max_paragraph_chars(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// RSS file, fully overwritten each cycle
    #[serde(default = "defaults::output")]
    pub output: PathBuf,

    /// JSON file holding previously seen article ids
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: defaults::output(),
            state_file: defaults::state_file(),
        }
    }
}

/// Daemon sleep bounds in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "defaults::min_interval")]
    pub min_interval_secs: u64,

    #[serde(default = "defaults::max_interval")]
    pub max_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: defaults::min_interval(),
            max_interval_secs: defaults::max_interval(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            port: defaults::port(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Provider defaults
    pub fn base_url() -> String {
        "https://dev.to/api".into()
    }
    pub fn user_agent() -> String {
        "devto-top-month-rss/1.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_base_delay() -> u64 {
        1000
    }
    pub fn retry_jitter() -> u64 {
        1000
    }
    pub fn max_retry_after() -> u64 {
        60
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn limit() -> usize {
        20
    }
    pub fn top_days() -> u32 {
        30
    }

    // Feed defaults
    pub fn feed_title() -> String {
        "DEV.to Top Posts This Month".into()
    }
    pub fn feed_link() -> String {
        "https://dev.to/top/month".into()
    }
    pub fn feed_description() -> String {
        "Top DEV.to posts from the last 30 days.".into()
    }
    pub fn max_paragraphs() -> usize {
        3
    }
    pub fn max_paragraph_chars() -> usize {
        600
    }

    // Path defaults
    pub fn output() -> PathBuf {
        PathBuf::from("devto_top_month.xml")
    }
    pub fn state_file() -> PathBuf {
        PathBuf::from("devto_top_month_state.json")
    }

    // Schedule defaults
    pub fn min_interval() -> u64 {
        900
    }
    pub fn max_interval() -> u64 {
        1200
    }

    // Server defaults
    pub fn bind() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        8000
    }
}
