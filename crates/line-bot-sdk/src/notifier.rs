//! Outbound text messages with quoting and user mentions.
//!
//! [`Notifier`] is the seam handlers use to answer users. [`LineNotifier`] is
//! the Messaging API implementation; tests and alternative transports can
//! provide their own.
//!
//! Replies use the reply token of an inbound event and are free of charge.
//! Sends push to a user, group or room id and count against the channel's
//! message quota.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

use crate::client::{
    ClientConfig, Message, MessagingClient, PushMessageRequest, ReplyMessageRequest,
    SentMessagesResponse, SubstitutionObject,
};
use crate::error::NotifierError;

/// Provider-assigned identifier of a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quoting and mention options for an outbound message.
///
/// # Examples
///
/// ```
/// use line_bot_sdk::notifier::NotifyOptions;
///
/// let options = NotifyOptions::default()
///     .with_quote_token("q3Plxr4AgKd")
///     .with_mention("user", "U4af4980629");
///
/// assert_eq!(options.mentions.get("user").map(String::as_str), Some("U4af4980629"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Quote token of the message to quote
    pub quote_token: Option<String>,

    /// Placeholder key (as in `{key}`) to mentioned user id
    pub mentions: BTreeMap<String, String>,
}

impl NotifyOptions {
    pub fn with_quote_token(mut self, quote_token: impl Into<String>) -> Self {
        self.quote_token = Some(quote_token.into());
        self
    }

    pub fn with_mention(mut self, key: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.mentions.insert(key.into(), user_id.into());
        self
    }
}

/// Build the `textV2` message for `text` and `options`.
///
/// Every mention entry becomes a user mention substitution under the same
/// key. An empty quote token is treated as absent.
pub fn build_text_message(text: &str, options: &NotifyOptions) -> Message {
    let substitution = options
        .mentions
        .iter()
        .map(|(key, user_id)| (key.clone(), SubstitutionObject::user_mention(user_id.as_str())))
        .collect();

    Message::TextV2 {
        text: text.to_string(),
        substitution,
        quote_token: options.quote_token.clone().filter(|t| !t.is_empty()),
    }
}

/// Sends text messages to LINE users, groups and rooms.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Reply to an inbound event using its reply token.
    async fn reply(
        &self,
        reply_token: &str,
        text: &str,
        options: &NotifyOptions,
    ) -> Result<MessageId, NotifierError>;

    /// Push a message to a user, group or room id.
    async fn send(
        &self,
        target_id: &str,
        text: &str,
        options: &NotifyOptions,
    ) -> Result<MessageId, NotifierError>;
}

/// [`Notifier`] backed by the Messaging API.
#[derive(Debug, Clone)]
pub struct LineNotifier {
    client: MessagingClient,
    bot_user_id: String,
}

impl LineNotifier {
    /// Build a client for `channel_access_token` and look up the bot's own
    /// user id.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Provider` if the client cannot be built or the
    /// bot profile lookup fails.
    pub async fn connect(
        channel_access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, NotifierError> {
        let client = MessagingClient::new(channel_access_token, config)?;
        let info = client.get_bot_info().await?;

        info!(bot_user_id = %info.user_id, display_name = %info.display_name, "Connected to messaging API");

        Ok(Self::from_client(client, info.user_id))
    }

    /// Wrap an existing client whose bot user id is already known.
    pub fn from_client(client: MessagingClient, bot_user_id: impl Into<String>) -> Self {
        Self {
            client,
            bot_user_id: bot_user_id.into(),
        }
    }

    /// User id of the bot account.
    pub fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    pub fn client(&self) -> &MessagingClient {
        &self.client
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn reply(
        &self,
        reply_token: &str,
        text: &str,
        options: &NotifyOptions,
    ) -> Result<MessageId, NotifierError> {
        let request =
            ReplyMessageRequest::new(reply_token, vec![build_text_message(text, options)]);
        let response = self.client.reply_message(&request).await?;

        first_message_id(response)
    }

    async fn send(
        &self,
        target_id: &str,
        text: &str,
        options: &NotifyOptions,
    ) -> Result<MessageId, NotifierError> {
        let request = PushMessageRequest::new(target_id, vec![build_text_message(text, options)]);
        let response = self.client.push_message(&request, None).await?;

        first_message_id(response)
    }
}

fn first_message_id(response: SentMessagesResponse) -> Result<MessageId, NotifierError> {
    let sent = response
        .sent_messages
        .into_iter()
        .next()
        .ok_or(NotifierError::EmptyResponse)?;

    debug!(message_id = %sent.id, "Message accepted");
    Ok(MessageId::new(sent.id))
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
