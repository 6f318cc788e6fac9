//! Echo bot behaviour wired up by the binary.

use line_bot_sdk::events::MessageEvent;
use line_bot_sdk::notifier::{Notifier, NotifyOptions};
use line_bot_sdk::webhook::WebhookReceiver;
use std::sync::Arc;
use tracing::info;

/// Text of the reply sent for an inbound text message.
pub fn echo_reply(text: &str) -> String {
    format!("Hello, This is your reply: {}", text)
}

/// Register a message handler that replies to every text message with
/// [`echo_reply`].
pub async fn register_echo_handler(receiver: &WebhookReceiver, notifier: Arc<dyn Notifier>) {
    receiver
        .set_message_handler(move |event: MessageEvent| {
            let notifier = notifier.clone();
            async move {
                let reply = echo_reply(&event.data.text);
                let message_id = notifier
                    .reply(&event.data.reply_token, &reply, &NotifyOptions::default())
                    .await?;

                info!(
                    webhook_event_id = %event.webhook_event_id,
                    message_id = %message_id,
                    "Echo reply sent"
                );
                Ok::<(), line_bot_sdk::HandlerError>(())
            }
        })
        .await;
}

#[cfg(test)]
#[path = "echo_tests.rs"]
mod tests;
