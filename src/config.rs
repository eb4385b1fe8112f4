//! Poller configuration: the feed URL, the poll interval, and the request
//! timeout.
//!
//! Configuration is validated at construction: a poller can never come up
//! with an empty URL or a zero interval and discover it at runtime. Settings
//! come either from a TOML file ([`FeedConfig::load`]) or directly from the
//! caller ([`FeedConfig::new`]).
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Feed URL must not be empty")]
    MissingUrl,

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),

    #[error("Poll interval must be greater than zero")]
    InvalidInterval,

    #[error("Request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Immutable poller configuration.
///
/// Constructed once, before the poll loop starts, and never mutated
/// afterwards. Invariants (checked by every constructor):
///
/// - `url` is a parseable http/https URL
/// - `interval > 0`
/// - `timeout > 0`
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed URL fetched on every tick.
    pub url: Url,

    /// Time between the end of one tick and the start of the next.
    pub interval: Duration,

    /// Per-request cap on how long a single fetch may take.
    pub timeout: Duration,
}

/// On-disk shape of the config file. Durations are plain second counts so
/// the file stays human-editable.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    url: String,
    interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    FeedConfig::DEFAULT_TIMEOUT.as_secs()
}

impl FeedConfig {
    /// Default per-request timeout when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Build a config from a URL string and a poll interval, with the
    /// default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is empty, unparseable, or not
    /// http/https, or if the interval is zero.
    pub fn new(url: &str, interval: Duration) -> Result<Self, ConfigError> {
        Self::with_timeout(url, interval, Self::DEFAULT_TIMEOUT)
    }

    /// Build a config with an explicit request timeout.
    pub fn with_timeout(
        url: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let url = validate_url(url)?;

        if interval.is_zero() {
            return Err(ConfigError::InvalidInterval);
        }
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(Self {
            url,
            interval,
            timeout,
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected shape:
    ///
    /// ```toml
    /// url = "https://example.com/feed.xml"
    /// interval_secs = 600
    /// timeout_secs = 30   # optional, defaults to 30
    /// ```
    ///
    /// Unknown keys are accepted (serde default behavior) but logged as a
    /// warning to catch typos. A poller without a URL cannot run, so a
    /// missing file is an error rather than a fallback to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["url", "interval_secs", "timeout_secs"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let file: ConfigFile = toml::from_str(&content)?;
        let config = Self::with_timeout(
            &file.url,
            Duration::from_secs(file.interval_secs),
            Duration::from_secs(file.timeout_secs),
        )?;

        tracing::info!(
            path = %path.display(),
            url = %config.url,
            interval_secs = config.interval.as_secs(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

/// Parse and validate a feed URL string.
///
/// Accepts any parseable http/https URL, including localhost and private
/// addresses: pollers are routinely pointed at intranet feeds.
fn validate_url(url_str: &str) -> Result<Url, ConfigError> {
    if url_str.trim().is_empty() {
        return Err(ConfigError::MissingUrl);
    }

    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(ConfigError::UnsupportedScheme(scheme.to_owned())),
    }

    Ok(url)
}

// ============================================================================
// Tests
// ============================================================================
