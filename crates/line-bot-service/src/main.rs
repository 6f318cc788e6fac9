//! # LINE Bot Service
//!
//! Binary entry point of the echo bot.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Connects to the Messaging API and registers the echo handler
//! - Builds the LINE Pay client when a pay channel is configured
//! - Starts the HTTP server
//!
//! Exit codes: 1 bind failure, 2 server failure, 3 configuration error,
//! 4 messaging API unreachable at startup.

use anyhow::Context;
use line_bot_sdk::{LineNotifier, Notifier, WebhookReceiver};
use line_bot_service::{
    build_pay_client, config::LoggingConfig, echo::register_echo_handler, start_server, AppState,
    ServiceConfig, ServiceError,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default())?;
            error!(error = %e, "Failed to load configuration; aborting");
            std::process::exit(ServiceError::Configuration(e).exit_code());
        }
    };

    init_tracing(&config.logging)?;

    info!("Starting LINE bot service");

    if let Err(e) = config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(ServiceError::Configuration(e).exit_code());
    }

    let notifier = match LineNotifier::connect(
        config.channel.channel_access_token.as_str(),
        config.channel.client_config(),
    )
    .await
    {
        Ok(notifier) => notifier,
        Err(e) => {
            let e = ServiceError::NotifierConnect {
                message: e.to_string(),
            };
            error!(error = %e, "Could not reach the messaging API; aborting");
            std::process::exit(e.exit_code());
        }
    };

    let pay_client = match build_pay_client(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build LINE Pay client; aborting");
            std::process::exit(e.exit_code());
        }
    };

    let receiver = Arc::new(WebhookReceiver::new(config.channel.channel_secret.as_str()));
    let notifier: Arc<dyn Notifier> = Arc::new(notifier);
    register_echo_handler(&receiver, notifier).await;

    info!(
        host = %config.server.host,
        port = config.server.port,
        callback_path = %config.webhook.callback_path,
        "Starting HTTP server"
    );

    let mut state = AppState::new(config, receiver);
    if let Some(client) = pay_client {
        state = state.with_pay_client(client);
    }

    if let Err(e) = start_server(state).await {
        error!("Server terminated: {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.as_str().into());

    let registry = tracing_subscriber::registry().with(filter);

    let result = if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.context("Failed to install tracing subscriber")
}
