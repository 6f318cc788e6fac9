//! Error types for LINE bot SDK operations.
//!
//! Each stage of the pipeline has its own error type: signature validation,
//! event dispatch, messaging API calls and the outbound notifier. None of them
//! are retried inside the SDK; `ApiError::is_transient` exists so callers can
//! decide on their own retry policy.

use thiserror::Error;

use crate::events::EventKind;

/// Error returned by application-provided event handlers.
///
/// The dispatcher never inspects it; it is logged and passed through unchanged.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Webhook signature validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The signature header could not be decoded.
    #[error("Invalid signature format: {message}")]
    InvalidSignatureFormat { message: String },

    /// The HMAC could not be computed with the configured secret.
    #[error("HMAC computation failed: {message}")]
    HmacError { message: String },
}

/// Per-event dispatch failures.
///
/// These are terminal for the event they describe. The dispatcher logs them
/// and moves on to the next event of the batch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The provider sent an event type outside the supported set.
    #[error("unsupported event: {0}")]
    UnsupportedEventKind(String),

    /// A message event carried content other than text.
    #[error("unsupported message content: {0}")]
    UnsupportedMessageContent(String),

    /// The event JSON could not be decoded into the wire model.
    #[error("malformed {kind} event: {message}")]
    MalformedEvent { kind: String, message: String },

    /// The registered handler reported a failure.
    #[error("{kind} handler failed: {source}")]
    Handler {
        kind: EventKind,
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Check whether this error was produced while classifying the raw event,
    /// before any handler could run.
    pub fn is_classification(&self) -> bool {
        !matches!(self, Self::Handler { .. })
    }
}

/// Errors during LINE Messaging API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP response from the messaging API.
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    /// Network or transport failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The client could not be constructed.
    #[error("Client configuration error: {message}")]
    Configuration { message: String },
}

impl ApiError {
    /// Check if this error represents a transient condition that may succeed if retried.
    ///
    /// Transient conditions are server errors (5xx), rate limiting (429) and
    /// transport failures.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { status, .. } => *status >= 500 || *status == 429,
            Self::Network(_) => true,
            Self::InvalidResponse { .. } => false,
            Self::Configuration { .. } => false,
        }
    }
}

/// Errors returned by the outbound notifier.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The messaging API rejected the call or could not be reached.
    #[error("provider error: {0}")]
    Provider(#[from] ApiError),

    /// The provider accepted the call but reported no sent message.
    #[error("no sent message in provider response")]
    EmptyResponse,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
