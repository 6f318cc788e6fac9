//! Merchant channel configuration.

use std::time::Duration;
use zeroize::Zeroizing;

/// Production endpoint of the online API.
pub const PRODUCTION_BASE_URL: &str = "https://api-pay.line.me";

/// Sandbox endpoint of the online API.
pub const SANDBOX_BASE_URL: &str = "https://sandbox-api-pay.line.me";

/// Credentials and endpoint selection for a LINE Pay merchant channel.
///
/// # Examples
///
/// ```
/// use line_pay::PayConfig;
///
/// let config = PayConfig::new(false, "1234567890", "channel-secret");
/// assert_eq!(config.base_url(), "https://sandbox-api-pay.line.me");
/// ```
#[derive(Clone)]
pub struct PayConfig {
    /// Use the production endpoint instead of the sandbox
    pub is_production: bool,
    pub channel_id: String,
    channel_secret: Zeroizing<String>,
    base_url_override: Option<String>,
    /// Request timeout duration
    pub timeout: Duration,
}

impl PayConfig {
    pub fn new(
        is_production: bool,
        channel_id: impl Into<String>,
        channel_secret: impl Into<String>,
    ) -> Self {
        Self {
            is_production,
            channel_id: channel_id.into(),
            channel_secret: Zeroizing::new(channel_secret.into()),
            base_url_override: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the client at a different endpoint, e.g. a local mock.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        match &self.base_url_override {
            Some(url) => url.trim_end_matches('/'),
            None if self.is_production => PRODUCTION_BASE_URL,
            None => SANDBOX_BASE_URL,
        }
    }

    pub(crate) fn channel_secret(&self) -> &str {
        &self.channel_secret
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for PayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayConfig")
            .field("is_production", &self.is_production)
            .field("channel_id", &self.channel_id)
            .field("channel_secret", &"<REDACTED>")
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
