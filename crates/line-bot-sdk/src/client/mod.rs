//! LINE Messaging API client.
//!
//! This module provides [`MessagingClient`] for the small set of REST calls a
//! bot needs: looking up its own profile and sending reply or push messages.
//! Every call is authenticated with the channel access token as a bearer
//! token. Calls are not retried.

mod message;

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::ApiError;

pub use message::{
    BotInfo, MentionTarget, Message, PushMessageRequest, ReplyMessageRequest, SentMessage,
    SentMessagesResponse, SubstitutionObject,
};

/// Default endpoint of the Messaging API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

/// Header used to make push requests idempotent.
pub const RETRY_KEY_HEADER: &str = "X-Line-Retry-Key";

/// Configuration for Messaging API client behavior.
///
/// # Examples
///
/// ```
/// use line_bot_sdk::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_api_base_url("http://localhost:8080");
/// assert_eq!(config.api_base_url, "http://localhost:8080");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for API requests
    pub user_agent: String,
    /// Request timeout duration
    pub timeout: Duration,
    /// Messaging API base URL
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("line-bot-sdk/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for client configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API base URL. A trailing slash is ignored.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Builder for constructing `ClientConfig` instances.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Messaging API client authenticated with a channel access token.
///
/// # Examples
///
/// ```no_run
/// # use line_bot_sdk::client::{ClientConfig, MessagingClient};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MessagingClient::new("channel-access-token", ClientConfig::default())?;
///
/// let info = client.get_bot_info().await?;
/// println!("Bot: {} ({})", info.display_name, info.user_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MessagingClient {
    http_client: reqwest::Client,
    access_token: Zeroizing<String>,
    config: ClientConfig,
}

impl MessagingClient {
    /// Create a client for the given channel access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built.
    pub fn new(
        channel_access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            access_token: Zeroizing::new(channel_access_token.into()),
            config,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the bot's own profile (`GET /v2/bot/info`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails, the provider answers with a
    /// non-success status, or the body cannot be decoded.
    pub async fn get_bot_info(&self) -> Result<BotInfo, ApiError> {
        let request = self.http_client.get(self.url("/v2/bot/info"));
        self.execute(request).await
    }

    /// Reply to an event using its reply token (`POST /v2/bot/message/reply`).
    pub async fn reply_message(
        &self,
        request: &ReplyMessageRequest,
    ) -> Result<SentMessagesResponse, ApiError> {
        let builder = self
            .http_client
            .post(self.url("/v2/bot/message/reply"))
            .json(request);
        self.execute(builder).await
    }

    /// Push messages to a user, group or room (`POST /v2/bot/message/push`).
    ///
    /// When `retry_key` is given it is sent as `X-Line-Retry-Key` so the
    /// provider can deduplicate a resent request.
    pub async fn push_message(
        &self,
        request: &PushMessageRequest,
        retry_key: Option<&str>,
    ) -> Result<SentMessagesResponse, ApiError> {
        let mut builder = self
            .http_client
            .post(self.url("/v2/bot/message/push"))
            .json(request);
        if let Some(key) = retry_key {
            builder = builder.header(RETRY_KEY_HEADER, key);
        }
        self.execute(builder).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.bearer_auth(self.access_token.as_str()).send().await?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Messaging API response");

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(ApiError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse {
            message: format!("Failed to decode response body: {}", e),
        })
    }
}

impl std::fmt::Debug for MessagingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingClient")
            .field("access_token", &"<REDACTED>")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
