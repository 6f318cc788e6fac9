//! Error types for LINE Pay operations.

use thiserror::Error;

/// Errors from the LINE Pay online API.
#[derive(Debug, Error)]
pub enum PayError {
    /// The request body could not be serialised; nothing was sent.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request signature could not be computed.
    #[error("Failed to sign request: {message}")]
    Signing { message: String },

    /// The gateway answered with a return code other than `0000`.
    #[error("Payment rejected: {code} - {message}")]
    Rejected { code: String, message: String },

    /// Non-success HTTP response.
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

impl PayError {
    /// Return code reported by the gateway, if the call got that far.
    pub fn return_code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }
}
