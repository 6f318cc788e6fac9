//! Common test utilities for LINE bot integration tests
//!
//! This module provides:
//! - A mockall double of the `Notifier` trait
//! - Signed callback request builders
//! - JSON fixtures for the supported event kinds

use async_trait::async_trait;
use bytes::Bytes;
use line_bot_sdk::notifier::{MessageId, Notifier, NotifyOptions};
use line_bot_sdk::webhook::{SignatureValidator, WebhookRequest, SIGNATURE_HEADER};
use line_bot_sdk::NotifierError;
use serde_json::{json, Value};
use std::collections::HashMap;

pub const CHANNEL_SECRET: &str = "integration-channel-secret";

// ============================================================================
// Mock Notifier
// ============================================================================

mockall::mock! {
    pub Notifier {}

    #[async_trait]
    impl Notifier for Notifier {
        async fn reply(
            &self,
            reply_token: &str,
            text: &str,
            options: &NotifyOptions,
        ) -> Result<MessageId, NotifierError>;

        async fn send(
            &self,
            target_id: &str,
            text: &str,
            options: &NotifyOptions,
        ) -> Result<MessageId, NotifierError>;
    }
}

// ============================================================================
// Request Builders
// ============================================================================

/// Callback document wrapping `events`.
pub fn callback_body(events: Vec<Value>) -> String {
    json!({"destination": "Ubot", "events": events}).to_string()
}

#[allow(dead_code)]
pub fn sign(body: &str, secret: &str) -> String {
    SignatureValidator::new(secret)
        .sign(body.as_bytes())
        .expect("HMAC accepts any key length")
}

/// Request carrying `body` and a signature computed with `secret`.
#[allow(dead_code)]
pub fn signed_request(body: &str, secret: &str) -> WebhookRequest {
    let headers = HashMap::from([
        (SIGNATURE_HEADER.to_string(), sign(body, secret)),
        ("content-type".to_string(), "application/json".to_string()),
    ]);
    WebhookRequest::new(headers, Bytes::from(body.to_string()))
}

// ============================================================================
// Event Fixtures
// ============================================================================

#[allow(dead_code)]
pub fn user_source(user_id: &str) -> Value {
    json!({"type": "user", "userId": user_id})
}

#[allow(dead_code)]
pub fn group_source(group_id: &str, user_id: &str) -> Value {
    json!({"type": "group", "groupId": group_id, "userId": user_id})
}

#[allow(dead_code)]
pub fn join_event(source: Value) -> Value {
    json!({
        "type": "join",
        "mode": "active",
        "timestamp": 1700000000000_i64,
        "source": source,
        "webhookEventId": "01HJOIN",
        "deliveryContext": {"isRedelivery": false},
        "replyToken": "join-reply-token"
    })
}

#[allow(dead_code)]
pub fn text_message_event(user_id: &str, text: &str, reply_token: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1700000001000_i64,
        "source": {"type": "user", "userId": user_id},
        "webhookEventId": "01HMESSAGE",
        "deliveryContext": {"isRedelivery": false},
        "replyToken": reply_token,
        "message": {
            "type": "text",
            "id": "468789577898262530",
            "quoteToken": "quote-token",
            "text": text
        }
    })
}

#[allow(dead_code)]
pub fn sticker_message_event(user_id: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1700000002000_i64,
        "source": {"type": "user", "userId": user_id},
        "webhookEventId": "01HSTICKER",
        "deliveryContext": {"isRedelivery": false},
        "replyToken": "sticker-reply-token",
        "message": {"type": "sticker", "id": "1", "packageId": "1", "stickerId": "1"}
    })
}
