//! Webhook receiver for HTTP intake and dispatch coordination.
//!
//! The receiver verifies the callback signature, decodes the batch envelope and
//! runs every event through the [`EventDispatcher`] before producing the HTTP
//! response. Handlers therefore finish before the provider sees a status code.
//!
//! # Examples
//!
//! ```rust,no_run
//! use line_bot_sdk::events::MessageEvent;
//! use line_bot_sdk::webhook::{WebhookReceiver, WebhookRequest};
//! use std::collections::HashMap;
//!
//! # async fn example() {
//! let receiver = WebhookReceiver::new("channel-secret");
//! receiver
//!     .set_message_handler(|event: MessageEvent| async move {
//!         println!("{}", event.data.text);
//!         Ok(())
//!     })
//!     .await;
//!
//! let headers = HashMap::from([("x-line-signature".to_string(), "c2ln".to_string())]);
//! let body = bytes::Bytes::from_static(br#"{"destination":"U1","events":[]}"#);
//!
//! let response = receiver.receive_webhook(WebhookRequest::new(headers, body)).await;
//! println!("Status: {}", response.status_code());
//! # }
//! ```

use bytes::Bytes;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::HandlerError;
use crate::events::{
    CallbackRequest, JoinEvent, LeaveEvent, MemberJoinedEvent, MemberLeftEvent, MessageEvent,
};
use crate::webhook::dispatcher::EventDispatcher;
use crate::webhook::handler::HandlerRegistry;
use crate::webhook::validation::SignatureValidator;

/// Header carrying the base64 HMAC of the callback body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

// ============================================================================
// Webhook Request/Response Types
// ============================================================================

/// Raw HTTP webhook request data.
///
/// # Examples
///
/// ```rust
/// use line_bot_sdk::webhook::WebhookRequest;
/// use std::collections::HashMap;
///
/// let headers = HashMap::from([("X-Line-Signature".to_string(), "abc=".to_string())]);
/// let request = WebhookRequest::new(headers, bytes::Bytes::from_static(b"{}"));
///
/// assert_eq!(request.signature(), Some("abc="));
/// ```
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    body: Bytes,
}

impl WebhookRequest {
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        Self { headers, body }
    }

    /// Value of the `x-line-signature` header, matched case-insensitively.
    pub fn signature(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(SIGNATURE_HEADER))
            .map(|(_, value)| value.as_str())
    }

    /// Raw body bytes exactly as received.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// HTTP response for webhook requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResponse {
    /// 200 OK - Batch dispatched; individual events may still have failed
    Ok {
        message: String,
        handled: usize,
        failed: usize,
    },

    /// 400 Bad Request - Missing or invalid signature
    BadRequest { message: String },

    /// 500 Internal Server Error - Body is not a callback document
    InternalError { message: String },
}

impl WebhookResponse {
    /// Get the HTTP status code for this response.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Ok { .. } => 200,
            Self::BadRequest { .. } => 400,
            Self::InternalError { .. } => 500,
        }
    }

    /// Get the response message.
    pub fn message(&self) -> &str {
        match self {
            Self::Ok { message, .. } => message,
            Self::BadRequest { message } => message,
            Self::InternalError { message } => message,
        }
    }

    /// Check if response indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

// ============================================================================
// Webhook Receiver
// ============================================================================

/// Verifies, decodes and dispatches LINE callback requests.
///
/// Handlers live in a registry behind a [`RwLock`], so they can be registered
/// or replaced while requests are being served.
#[derive(Debug)]
pub struct WebhookReceiver {
    validator: SignatureValidator,
    dispatcher: EventDispatcher,
}

impl WebhookReceiver {
    /// Create a receiver for the given channel secret with no handlers.
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self::with_registry(channel_secret, HandlerRegistry::new())
    }

    /// Create a receiver using a pre-populated handler registry.
    pub fn with_registry(channel_secret: impl Into<String>, registry: HandlerRegistry) -> Self {
        Self {
            validator: SignatureValidator::new(channel_secret),
            dispatcher: EventDispatcher::new(Arc::new(RwLock::new(registry))),
        }
    }

    pub async fn set_join_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(JoinEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.dispatcher
            .registry()
            .write()
            .await
            .set_join_handler(handler);
    }

    pub async fn set_leave_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(LeaveEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.dispatcher
            .registry()
            .write()
            .await
            .set_leave_handler(handler);
    }

    pub async fn set_member_joined_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(MemberJoinedEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.dispatcher
            .registry()
            .write()
            .await
            .set_member_joined_handler(handler);
    }

    pub async fn set_member_left_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(MemberLeftEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.dispatcher
            .registry()
            .write()
            .await
            .set_member_left_handler(handler);
    }

    pub async fn set_message_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(MessageEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.dispatcher
            .registry()
            .write()
            .await
            .set_message_handler(handler);
    }

    /// Process an incoming callback request.
    ///
    /// # Processing Steps
    ///
    /// 1. Verify the `x-line-signature` header against the raw body
    /// 2. Decode the callback envelope
    /// 3. Dispatch every event in order, to completion
    /// 4. Return the HTTP response
    ///
    /// A missing or invalid signature yields `BadRequest` and no handler runs.
    /// A body that is not a callback document yields `InternalError`. Once the
    /// batch is dispatched the response is `Ok` even if some events failed.
    pub async fn receive_webhook(&self, request: WebhookRequest) -> WebhookResponse {
        let Some(signature) = request.signature() else {
            warn!("Callback rejected: missing signature header");
            return WebhookResponse::BadRequest {
                message: "Missing x-line-signature header".to_string(),
            };
        };

        match self.validator.validate(request.payload(), signature) {
            Ok(true) => {
                debug!("Callback signature validated");
            }
            Ok(false) => {
                warn!("Callback rejected: signature mismatch");
                return WebhookResponse::BadRequest {
                    message: "Invalid signature".to_string(),
                };
            }
            Err(e) => {
                warn!(error = %e, "Callback rejected: unreadable signature");
                return WebhookResponse::BadRequest {
                    message: "Invalid signature".to_string(),
                };
            }
        }

        let callback = match CallbackRequest::from_slice(request.payload()) {
            Ok(callback) => callback,
            Err(e) => {
                warn!(error = %e, "Callback body is not a valid document");
                return WebhookResponse::InternalError {
                    message: format!("Invalid callback body: {}", e),
                };
            }
        };

        let report = self.dispatcher.dispatch(&callback.events).await;

        info!(
            destination = %callback.destination,
            events = callback.events.len(),
            handled = report.handled,
            unhandled = report.unhandled,
            failed = report.failures.len(),
            "Callback dispatched"
        );

        WebhookResponse::Ok {
            message: "OK".to_string(),
            handled: report.handled,
            failed: report.failures.len(),
        }
    }
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
