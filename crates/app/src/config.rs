//! Application configuration (environment-driven).

use std::time::Duration;

use storefront_catalog::DEFAULT_CATALOG_URL;
use storefront_observability::LogFormat;
use thiserror::Error;

pub const CATALOG_URL_VAR: &str = "STOREFRONT_CATALOG_URL";
pub const HTTP_TIMEOUT_VAR: &str = "STOREFRONT_HTTP_TIMEOUT_SECS";
pub const LOG_FORMAT_VAR: &str = "STOREFRONT_LOG_FORMAT";

/// Default transport timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOREFRONT_CATALOG_URL must be an http(s) URL, got `{0}`")]
    InvalidUrl(String),
    #[error("STOREFRONT_HTTP_TIMEOUT_SECS must be a positive number of seconds, got `{0}`")]
    InvalidTimeout(String),
    #[error("STOREFRONT_LOG_FORMAT: {0}")]
    InvalidLogFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub catalog_url: String,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(CATALOG_URL_VAR) {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.to_string()));
            }
            config.catalog_url = url.to_string();
        }

        if let Some(raw) = lookup(HTTP_TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            config.log_format = raw.parse().map_err(ConfigError::InvalidLogFormat)?;
        }

        Ok(config)
    }
}
