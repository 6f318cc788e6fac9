//! Configuration types for the HTTP service
//!
//! Sources (applied in order, later sources override earlier ones):
//!  1. `/etc/line-bot/service.yaml`, system-wide defaults
//!  2. `./config/service.yaml`, deployment-local override
//!  3. The file named by `LINE_BOT_CONFIG_FILE`
//!  4. Environment variables prefixed `LINEBOT__` with `__` as separator,
//!     e.g. `LINEBOT__SERVER__PORT=9090` sets `server.port = 9090`
//!
//! Every field has a default, so only the channel credentials must be
//! supplied. A malformed file or a value of the wrong type is a hard error.

use line_bot_sdk::client::ClientConfig;
use line_pay::PayConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;
use zeroize::Zeroizing;

use crate::errors::ConfigError;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_FILE_ENV: &str = "LINE_BOT_CONFIG_FILE";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "LINEBOT";

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Callback endpoint settings
    pub webhook: WebhookConfig,

    /// Messaging API channel credentials
    pub channel: ChannelConfig,

    /// Optional LINE Pay merchant channel
    pub pay: Option<PaySettings>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Callback endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Path the provider posts callbacks to
    pub callback_path: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            callback_path: "/callback".to_string(),
        }
    }
}

/// Messaging API channel credentials
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Key of the webhook signature
    pub channel_secret: Zeroizing<String>,

    /// Bearer credential of the messaging API
    pub channel_access_token: Zeroizing<String>,

    /// Override of the messaging API endpoint
    pub api_base_url: Option<String>,

    /// Outbound request timeout in seconds
    pub request_timeout_seconds: Option<u64>,
}

impl ChannelConfig {
    /// Messaging API client settings for this channel.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.api_base_url {
            config = config.with_api_base_url(url.clone());
        }
        if let Some(seconds) = self.request_timeout_seconds {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        config
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("channel_secret", &"<REDACTED>")
            .field("channel_access_token", &"<REDACTED>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

/// LINE Pay merchant channel settings
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaySettings {
    /// Use the production endpoint instead of the sandbox
    pub is_production: bool,
    pub channel_id: String,
    pub channel_secret: Zeroizing<String>,
    /// Override of the online API endpoint
    pub api_base_url: Option<String>,
}

impl PaySettings {
    pub fn pay_config(&self) -> PayConfig {
        let config = PayConfig::new(
            self.is_production,
            self.channel_id.clone(),
            self.channel_secret.as_str(),
        );
        match &self.api_base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

impl std::fmt::Debug for PaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaySettings")
            .field("is_production", &self.is_production)
            .field("channel_id", &self.channel_id)
            .field("channel_secret", &"<REDACTED>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "line_bot_service=info,line_bot_sdk=info,tower_http=info".to_string(),
            json_format: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the standard file locations and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit_path = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|p| !p.is_empty());

        let mut builder = config::Config::builder()
            .add_source(
                config::File::with_name("/etc/line-bot/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            )
            .add_source(
                config::File::with_name("config/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            );

        if let Some(path) = explicit_path {
            info!(path = %path, "Loading configuration from explicit path");
            builder = builder.add_source(
                config::File::with_name(&path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check the configuration for values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.channel_secret.is_empty() {
            return Err(ConfigError::Missing {
                key: "channel.channel_secret".to_string(),
            });
        }

        if self.channel.channel_access_token.is_empty() {
            return Err(ConfigError::Missing {
                key: "channel.channel_access_token".to_string(),
            });
        }

        if !self.webhook.callback_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhook.callback_path must start with '/': {}",
                    self.webhook.callback_path
                ),
            });
        }

        if self.webhook.callback_path == "/health" {
            return Err(ConfigError::Invalid {
                message: "webhook.callback_path conflicts with the health endpoint".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        if let Some(pay) = &self.pay {
            if pay.channel_id.is_empty() {
                return Err(ConfigError::Missing {
                    key: "pay.channel_id".to_string(),
                });
            }
            if pay.channel_secret.is_empty() {
                return Err(ConfigError::Missing {
                    key: "pay.channel_secret".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
