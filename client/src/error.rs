//! Error types for building the HTTP client

use thiserror::Error;

/// Errors that can occur while configuring the client
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `EVENTDESK_API_URL` (or an explicit base URL) is not a usable URL
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Offending value
        url: String,
        /// Why it was refused
        reason: String,
    },

    /// `EVENTDESK_TIMEOUT_SECS` is not a positive integer
    #[error("Invalid request timeout '{0}'")]
    InvalidTimeout(String),

    /// The underlying HTTP client could not be built
    #[error("HTTP client construction failed: {0}")]
    HttpClient(String),
}
