//! Request signing for the online API.
//!
//! Every request carries `X-LINE-Authorization`, the base64 HMAC-SHA256 of
//! `secret + path + content + nonce` keyed with the channel secret. `content`
//! is the query string (without `?`) for GET requests and the exact JSON body
//! for every other method.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::PayError;

type HmacSha256 = Hmac<Sha256>;

pub const CHANNEL_ID_HEADER: &str = "X-LINE-ChannelId";
pub const AUTHORIZATION_HEADER: &str = "X-LINE-Authorization";
pub const NONCE_HEADER: &str = "X-LINE-Authorization-Nonce";

/// Fresh request nonce (UUID v4).
pub fn new_nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Compute the authorization signature for one request.
pub fn sign_request(
    channel_secret: &str,
    api_path: &str,
    content: &str,
    nonce: &str,
) -> Result<String, PayError> {
    let mut mac =
        HmacSha256::new_from_slice(channel_secret.as_bytes()).map_err(|e| PayError::Signing {
            message: format!("Failed to create HMAC instance: {}", e),
        })?;
    mac.update(channel_secret.as_bytes());
    mac.update(api_path.as_bytes());
    mac.update(content.as_bytes());
    mac.update(nonce.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
#[path = "signing_tests.rs"]
mod tests;
