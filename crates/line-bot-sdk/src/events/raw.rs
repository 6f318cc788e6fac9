//! Wire model of the LINE webhook callback body.
//!
//! Events are kept as raw JSON inside [`CallbackRequest`] and decoded one at a
//! time, so a single unknown or malformed event never rejects the batch.
//! Every field the SDK does not strictly need is optional or defaulted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a webhook callback request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    /// User id of the bot that should receive the events
    #[serde(default)]
    pub destination: String,

    /// Raw events in provider order
    #[serde(default)]
    pub events: Vec<Value>,
}

impl CallbackRequest {
    /// Decode a callback body. Only a JSON object is a callback document.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom(
                "callback body must be a JSON object",
            ));
        }
        serde_json::from_value(value)
    }
}

/// One decoded webhook event, all kinds merged into a single shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub webhook_event_id: String,

    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub source: Option<RawSource>,

    #[serde(default)]
    pub reply_token: Option<String>,

    /// Present on `memberJoined`
    #[serde(default)]
    pub joined: Option<RawMembers>,

    /// Present on `memberLeft`
    #[serde(default)]
    pub left: Option<RawMembers>,

    /// Present on `message`; decoded separately by content type
    #[serde(default)]
    pub message: Option<Value>,
}

/// Source descriptor as sent by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSource {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

impl RawSource {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            kind: "user".to_string(),
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }
}

/// Member list of `memberJoined` / `memberLeft` events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMembers {
    #[serde(default)]
    pub members: Vec<RawSource>,
}

impl RawMembers {
    /// User ids of the members, preserving provider order.
    pub fn user_ids(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.user_id.clone().unwrap_or_default())
            .collect()
    }
}

/// Message content of a `message` event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessageContent {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub quote_token: Option<String>,

    #[serde(default)]
    pub quoted_message_id: Option<String>,
}

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;
