//! # LINE Pay
//!
//! Minimal client for the LINE Pay online API (v3): reserve a payment, let the
//! user approve it, then confirm it.
//!
//! Requests are signed with the merchant channel secret. Responses use a
//! common `{returnCode, returnMessage, info}` envelope; any return code other
//! than `0000` is surfaced as [`PayError::Rejected`].

pub mod client;
pub mod config;
pub mod error;
pub mod signing;
pub mod types;

pub use client::PayClient;
pub use config::{PayConfig, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use error::PayError;
pub use types::{
    ConfirmPaymentInfo, ConfirmUrlType, Package, PayInfo, PaymentDetail, PaymentRequest,
    PaymentUrl, Product, RedirectUrls, RequestPaymentInfo,
};
