//! Configuration for the recap engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default archive host
pub const DEFAULT_BASE_URL: &str = "https://v-archive.net";
/// Default number of board requests in flight
pub const DEFAULT_CONCURRENCY: usize = 6;
/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Default number of attempts per request (first try included)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for the recap engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecapConfig {
    /// Base URL of the archive API
    pub base_url: String,
    /// Maximum number of board requests in flight
    pub concurrency: usize,
    /// Per-request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Attempts per request for transient failures
    pub max_retries: u32,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RecapConfig {
    /// Create a new configuration builder
    pub fn builder() -> RecapConfigBuilder {
        RecapConfigBuilder::default()
    }
}

/// Builder for RecapConfig
#[derive(Debug, Clone, Default)]
pub struct RecapConfigBuilder {
    base_url: Option<String>,
    concurrency: Option<usize>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
}

impl RecapConfigBuilder {
    /// Start from an existing configuration instead of the defaults
    pub fn from_config(config: RecapConfig) -> Self {
        Self {
            base_url: Some(config.base_url),
            concurrency: Some(config.concurrency),
            timeout: Some(config.timeout),
            max_retries: Some(config.max_retries),
        }
    }

    /// Set the archive base URL
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the number of concurrent board requests
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the number of attempts for transient failures
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Build the configuration
    pub fn build(self) -> RecapConfig {
        let default = RecapConfig::default();
        RecapConfig {
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(default.base_url),
            concurrency: self.concurrency.unwrap_or(default.concurrency).max(1),
            timeout: self.timeout.unwrap_or(default.timeout),
            max_retries: self.max_retries.unwrap_or(default.max_retries).max(1),
        }
    }
}

/// Durations are written as whole seconds in config files
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
