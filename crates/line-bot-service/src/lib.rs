//! # LINE Bot HTTP Service
//!
//! HTTP server hosting the callback endpoint of a LINE bot.
//!
//! This service provides:
//! - The callback endpoint, verified with the channel secret and dispatched
//!   to registered handlers before the response is written
//! - A health check endpoint
//!
//! Handler failures are logged and never change the callback response.

pub mod config;
pub mod echo;
pub mod errors;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use line_bot_sdk::webhook::{WebhookReceiver, WebhookRequest, WebhookResponse};
use line_pay::PayClient;
use serde::Serialize;
use std::{collections::HashMap, future::Future, future::IntoFuture, sync::Arc, time::Duration};
use tokio::sync::Notify;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info, instrument, warn};

pub use config::ServiceConfig;
pub use errors::{CallbackError, ConfigError, ServiceError};

// ============================================================================
// Application State
// ============================================================================

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub receiver: Arc<WebhookReceiver>,
    /// Present when a LINE Pay channel is configured
    pub pay: Option<Arc<PayClient>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, receiver: Arc<WebhookReceiver>) -> Self {
        Self {
            config: Arc::new(config),
            receiver,
            pay: None,
        }
    }

    pub fn with_pay_client(mut self, client: PayClient) -> Self {
        self.pay = Some(Arc::new(client));
        self
    }

    pub fn pay_client(&self) -> Option<&PayClient> {
        self.pay.as_deref()
    }
}

/// Build the LINE Pay client for the configured channel, if any.
pub fn build_pay_client(config: &ServiceConfig) -> Result<Option<PayClient>, ServiceError> {
    let Some(pay) = &config.pay else {
        return Ok(None);
    };

    let client = PayClient::new(pay.pay_config()).map_err(|e| {
        ServiceError::Configuration(ConfigError::Invalid {
            message: format!("LINE Pay client: {}", e),
        })
    })?;

    info!(
        channel_id = %client.config().channel_id,
        base_url = %client.config().base_url(),
        "LINE Pay client configured"
    );
    Ok(Some(client))
}

// ============================================================================
// Responses
// ============================================================================

/// Body of a successful callback response
#[derive(Debug, Clone, Serialize)]
pub struct CallbackAccepted {
    pub message: String,
    pub handled: usize,
    pub failed: usize,
}

/// Body of the health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub pay_enabled: bool,
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_body_size;

    Router::new()
        .route(&state.config.webhook.callback_path, post(handle_callback))
        .route("/health", get(handle_health_check))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .with_state(state)
}

/// Start HTTP server
pub async fn start_server(state: AppState) -> Result<(), ServiceError> {
    let address = format!("{}:{}", state.config.server.host, state.config.server.port);
    let shutdown_timeout = Duration::from_secs(state.config.server.shutdown_timeout_seconds);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    info!("Starting HTTP server on {}", address);

    serve_until(listener, app, shutdown_signal(shutdown_timeout), shutdown_timeout).await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Serve `app` until `signal` resolves, then drain in-flight requests for at
/// most `shutdown_timeout`.
///
/// Requests still running when the deadline passes are abandoned.
pub async fn serve_until<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    signal: F,
    shutdown_timeout: Duration,
) -> Result<(), ServiceError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let triggered = Arc::new(Notify::new());
    let notify = triggered.clone();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            notify.notify_one();
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            });
        }
        _ = triggered.notified() => {}
    }

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => result.map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        }),
        Err(_) => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out; abandoning in-flight requests"
            );
            Ok(())
        }
    }
}

async fn shutdown_signal(shutdown_timeout: Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
        },
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handle LINE callback requests
///
/// The batch is dispatched before the response is returned. Signature
/// problems answer 400, an unparseable body answers 500 and anything else
/// answers 200 regardless of individual handler outcomes.
#[instrument(skip(state, headers, body), fields(body_len = body.len()))]
pub async fn handle_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallbackAccepted>, CallbackError> {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_lowercase(), v.to_string()))
        })
        .collect();

    let request = WebhookRequest::new(headers, body);

    match state.receiver.receive_webhook(request).await {
        WebhookResponse::Ok {
            message,
            handled,
            failed,
        } => {
            debug!(handled, failed, "Callback accepted");
            Ok(Json(CallbackAccepted {
                message,
                handled,
                failed,
            }))
        }
        WebhookResponse::BadRequest { message } => Err(CallbackError::BadRequest { message }),
        WebhookResponse::InternalError { message } => Err(CallbackError::Internal { message }),
    }
}

/// Liveness probe
async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        pay_enabled: state.pay.is_some(),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
