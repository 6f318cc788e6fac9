//! Webhook signature validation implementation.
//!
//! LINE signs every callback body with HMAC-SHA256 keyed by the channel
//! secret and sends the base64-encoded digest in the `x-line-signature`
//! header. Comparison is constant time.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::ValidationError;

type HmacSha256 = Hmac<Sha256>;

/// Validates LINE webhook signatures using HMAC-SHA256.
///
/// # Security
///
/// - Uses constant-time comparison to prevent timing attacks
/// - Never logs secrets or signature values
/// - The channel secret is zeroed on drop
///
/// # Examples
///
/// ```rust
/// use line_bot_sdk::webhook::SignatureValidator;
///
/// let validator = SignatureValidator::new("channel-secret");
/// let body = br#"{"destination":"U1","events":[]}"#;
/// let signature = validator.sign(body).unwrap();
///
/// assert!(validator.validate(body, &signature).unwrap());
/// ```
#[derive(Clone)]
pub struct SignatureValidator {
    channel_secret: Zeroizing<String>,
}

impl SignatureValidator {
    /// Create a new signature validator for the given channel secret.
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: Zeroizing::new(channel_secret.into()),
        }
    }

    /// Validate a webhook signature.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Signature is valid
    /// * `Ok(false)` - Signature does not match the payload
    /// * `Err` - Signature is not base64, or the HMAC could not be computed
    pub fn validate(&self, payload: &[u8], signature: &str) -> Result<bool, ValidationError> {
        let signature_bytes = self.parse_signature(signature)?;
        let expected = self.compute_hmac(payload)?;

        Ok(self.constant_time_compare(&signature_bytes, &expected))
    }

    /// Compute the base64 signature the provider would send for `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<String, ValidationError> {
        Ok(STANDARD.encode(self.compute_hmac(payload)?))
    }

    fn parse_signature(&self, signature: &str) -> Result<Vec<u8>, ValidationError> {
        STANDARD
            .decode(signature.trim())
            .map_err(|e| ValidationError::InvalidSignatureFormat {
                message: format!("Invalid base64 encoding in signature: {}", e),
            })
    }

    fn compute_hmac(&self, payload: &[u8]) -> Result<Vec<u8>, ValidationError> {
        let mut mac = HmacSha256::new_from_slice(self.channel_secret.as_bytes()).map_err(|e| {
            ValidationError::HmacError {
                message: format!("Failed to create HMAC instance: {}", e),
            }
        })?;
        mac.update(payload);

        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn constant_time_compare(&self, a: &[u8], b: &[u8]) -> bool {
        // Length is not secret.
        if a.len() != b.len() {
            return false;
        }

        a.ct_eq(b).into()
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureValidator")
            .field("channel_secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
