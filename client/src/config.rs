//! Client configuration loaded from environment variables.

use crate::error::ConfigError;
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Default backend location for local development
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HttpEventsApi`](crate::HttpEventsApi)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration for an explicit base URL with the default timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `base_url` does not parse or
    /// cannot carry path segments (e.g. `mailto:` URLs).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables
    ///
    /// - `EVENTDESK_API_URL` (default `http://localhost:8080/api`)
    /// - `EVENTDESK_TIMEOUT_SECS` (default `30`)
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("EVENTDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = match env::var("EVENTDESK_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            timeout,
        })
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot carry a path".to_string(),
        });
    }

    Ok(url)
}

/// Parse a timeout given in whole seconds
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimeout`] for non-numeric or zero values.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
