// Wire model for the LINE Messaging API send endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outbound message object.
///
/// Only the `textV2` message type is modelled: text with `{key}` placeholders
/// that the provider substitutes with mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "textV2", rename_all = "camelCase")]
    TextV2 {
        /// Message body, may contain `{key}` placeholders
        text: String,

        /// Placeholder key to substitution
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        substitution: BTreeMap<String, SubstitutionObject>,

        /// Quote token of the message being quoted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quote_token: Option<String>,
    },
}

/// Replacement for a `{key}` placeholder in a `textV2` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubstitutionObject {
    Mention { mentionee: MentionTarget },
}

/// Who a mention substitution points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MentionTarget {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

impl SubstitutionObject {
    /// Mention of a single user.
    pub fn user_mention(user_id: impl Into<String>) -> Self {
        Self::Mention {
            mentionee: MentionTarget::User {
                user_id: user_id.into(),
            },
        }
    }
}

/// Body of `POST /v2/bot/message/reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessageRequest {
    pub reply_token: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub notification_disabled: bool,
}

impl ReplyMessageRequest {
    pub fn new(reply_token: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            reply_token: reply_token.into(),
            messages,
            notification_disabled: false,
        }
    }
}

/// Body of `POST /v2/bot/message/push`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessageRequest {
    /// User, group or room id
    pub to: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub notification_disabled: bool,
}

impl PushMessageRequest {
    pub fn new(to: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            to: to.into(),
            messages,
            notification_disabled: false,
        }
    }
}

/// Response of the reply and push endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessagesResponse {
    #[serde(default)]
    pub sent_messages: Vec<SentMessage>,
}

/// Identifier of a message the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub id: String,
    #[serde(default)]
    pub quote_token: Option<String>,
}

/// Response of `GET /v2/bot/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    /// The bot's own user id
    pub user_id: String,
    pub basic_id: String,
    #[serde(default)]
    pub premium_id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    /// `chat` or `bot`
    #[serde(default)]
    pub chat_mode: Option<String>,
    /// `auto` or `manual`
    #[serde(default)]
    pub mark_as_read_mode: Option<String>,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
