//! Client configuration.

use crate::cache::CacheConfig;
use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum confidence for a suggestion to be surfaced
pub const DEFAULT_SUGGESTION_THRESHOLD: f64 = 0.5;

/// Maximum suggestions fetched per content item
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Age after which a cached query is refetched (5 minutes)
pub const DEFAULT_STALE_TIME_SECS: u64 = 5 * 60;

/// Idle time after which a cached query is dropped (15 minutes)
pub const DEFAULT_CACHE_TIME_SECS: u64 = 15 * 60;

/// Configuration for the content relationship client
///
/// # Examples
///
/// ```
/// use engagerr_sdk::SdkConfig;
///
/// let config = SdkConfig::new("http://localhost:8080", "u1");
/// assert_eq!(config.suggestion_threshold, 0.5);
/// assert_eq!(config.suggestion_limit, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// API base URL (e.g., "https://app.engagerr.io")
    pub base_url: String,

    /// Creator the client acts for
    pub creator_id: String,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum suggestion confidence sent to the API
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: f64,

    /// Maximum suggestions requested
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Seconds before a cached query goes stale
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,

    /// Seconds an unused cached query is kept
    #[serde(default = "default_cache_time_secs")]
    pub cache_time_secs: u64,

    /// Check create requests against the cached family before sending
    #[serde(default)]
    pub validate_locally: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_suggestion_threshold() -> f64 {
    DEFAULT_SUGGESTION_THRESHOLD
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

fn default_stale_time_secs() -> u64 {
    DEFAULT_STALE_TIME_SECS
}

fn default_cache_time_secs() -> u64 {
    DEFAULT_CACHE_TIME_SECS
}

impl SdkConfig {
    /// Configuration with defaults for everything but URL and creator
    pub fn new(base_url: impl Into<String>, creator_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            creator_id: creator_id.into(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            stale_time_secs: DEFAULT_STALE_TIME_SECS,
            cache_time_secs: DEFAULT_CACHE_TIME_SECS,
            validate_locally: false,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Enable or disable local validation of create requests
    pub fn with_local_validation(mut self, enabled: bool) -> Self {
        self.validate_locally = enabled;
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache timing derived from this configuration
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            stale_time: Duration::from_secs(self.stale_time_secs),
            cache_time: Duration::from_secs(self.cache_time_secs),
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::ConfigError("base_url is required".to_string()));
        }
        if self.creator_id.trim().is_empty() {
            return Err(SdkError::ConfigError("creator_id is required".to_string()));
        }
        if !(0.0..=1.0).contains(&self.suggestion_threshold) {
            return Err(SdkError::ConfigError(format!(
                "suggestion_threshold must be in [0, 1], got {}",
                self.suggestion_threshold
            )));
        }
        if self.cache_time_secs < self.stale_time_secs {
            return Err(SdkError::ConfigError(
                "cache_time_secs must be at least stale_time_secs".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SdkConfig::new("http://localhost:8080", "u1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_config().stale_time, Duration::from_secs(300));
        assert_eq!(config.cache_config().cache_time, Duration::from_secs(900));
        assert!(!config.validate_locally);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"base_url": "http://api", "creator_id": "u7", "validate_locally": true}"#;
        let config: SdkConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.creator_id, "u7");
        assert_eq!(config.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
        assert!(config.validate_locally);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_validation_errors() {
        assert!(SdkConfig::new("", "u1").validate().is_err());
        assert!(SdkConfig::new("http://api", " ").validate().is_err());

        let mut config = SdkConfig::new("http://api", "u1");
        config.suggestion_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = SdkConfig::new("http://api", "u1");
        config.cache_time_secs = 10;
        assert!(config.validate().is_err());
    }
}
