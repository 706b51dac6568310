//! Bearer token sources

use eventdesk_core::environment::TokenSource;

/// Reads the token from `EVENTDESK_TOKEN` on every request
///
/// Re-reading lets a long-running process pick up a refreshed token.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvToken;

impl TokenSource for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var("EVENTDESK_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// A fixed token (or none at all)
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Always hand out `token`
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Signed-out source
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
