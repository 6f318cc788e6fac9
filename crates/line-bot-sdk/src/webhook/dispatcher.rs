//! Event classification and dispatch.
//!
//! The dispatcher turns each raw event of a verified callback batch into a
//! typed [`Event`] and invokes the handler registered for its kind. Events
//! are processed one at a time in provider order. A failure on one event is
//! logged and recorded in the [`DispatchReport`]; it never stops the batch.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::error::DispatchError;
use crate::events::{
    resolve_source, Event, EventKind, JoinData, LeaveData, MemberJoinedData, MemberLeftData,
    MessageData, RawEvent, RawMessageContent, WebhookEvent,
};
use crate::webhook::handler::HandlerRegistry;

/// Stage of the pipeline an event failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    /// Turning raw JSON into a typed event
    Classify,
    /// Running the registered handler
    Handle,
}

impl std::fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classify => f.write_str("classify"),
            Self::Handle => f.write_str("handle"),
        }
    }
}

/// A single failed event within a batch.
#[derive(Debug)]
pub struct DispatchFailure {
    /// Position of the event in the batch
    pub index: usize,
    pub stage: DispatchStage,
    pub error: DispatchError,
}

/// Outcome of dispatching one callback batch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Events whose handler ran and succeeded
    pub handled: usize,

    /// Events of a supported kind with no registered handler
    pub unhandled: usize,

    /// Events that failed classification or whose handler failed
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    /// Number of events that failed classification.
    pub fn classification_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.stage == DispatchStage::Classify)
            .count()
    }

    /// Number of events whose handler failed.
    pub fn handler_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.stage == DispatchStage::Handle)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Classify a raw provider event into the closed set of supported events.
///
/// Total over every JSON value: unsupported kinds, non-text message content
/// and undecodable events all produce a [`DispatchError`].
pub fn classify(raw: &Value) -> Result<Event, DispatchError> {
    let kind_name = raw
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let Some(kind) = EventKind::from_wire(&kind_name) else {
        return Err(DispatchError::UnsupportedEventKind(kind_name));
    };

    let event: RawEvent =
        serde_json::from_value(raw.clone()).map_err(|e| DispatchError::MalformedEvent {
            kind: kind_name.clone(),
            message: e.to_string(),
        })?;

    let source = resolve_source(event.source.as_ref());
    let webhook_event_id = event.webhook_event_id;
    let timestamp = event.timestamp;
    let reply_token = event.reply_token.unwrap_or_default();

    let classified = match kind {
        EventKind::Join => Event::Join(WebhookEvent {
            webhook_event_id,
            source,
            timestamp,
            data: JoinData { reply_token },
        }),
        EventKind::Leave => Event::Leave(WebhookEvent {
            webhook_event_id,
            source,
            timestamp,
            data: LeaveData {},
        }),
        EventKind::MemberJoined => Event::MemberJoined(WebhookEvent {
            webhook_event_id,
            source,
            timestamp,
            data: MemberJoinedData {
                reply_token,
                joined_member_ids: event.joined.map(|m| m.user_ids()).unwrap_or_default(),
            },
        }),
        EventKind::MemberLeft => Event::MemberLeft(WebhookEvent {
            webhook_event_id,
            source,
            timestamp,
            data: MemberLeftData {
                left_member_ids: event.left.map(|m| m.user_ids()).unwrap_or_default(),
            },
        }),
        EventKind::Message => {
            let content = classify_message_content(event.message)?;
            Event::Message(WebhookEvent {
                webhook_event_id,
                source,
                timestamp,
                data: MessageData {
                    reply_token,
                    message_id: content.id,
                    text: content.text.unwrap_or_default(),
                    quote_token: content.quote_token.unwrap_or_default(),
                    quoted_message_id: content.quoted_message_id,
                },
            })
        }
    };

    Ok(classified)
}

/// Only text content is supported.
fn classify_message_content(message: Option<Value>) -> Result<RawMessageContent, DispatchError> {
    let message = message.unwrap_or(Value::Null);
    let content_kind = message
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if content_kind != "text" {
        return Err(DispatchError::UnsupportedMessageContent(content_kind));
    }

    serde_json::from_value(message).map_err(|e| DispatchError::MalformedEvent {
        kind: EventKind::Message.to_string(),
        message: format!("text content: {}", e),
    })
}

/// Routes classified events to the handler registered for their kind.
#[derive(Clone, Debug)]
pub struct EventDispatcher {
    registry: Arc<RwLock<HandlerRegistry>>,
}

impl EventDispatcher {
    /// Create a dispatcher reading handlers from `registry`.
    pub fn new(registry: Arc<RwLock<HandlerRegistry>>) -> Self {
        Self { registry }
    }

    /// Registry shared with this dispatcher.
    pub fn registry(&self) -> &Arc<RwLock<HandlerRegistry>> {
        &self.registry
    }

    /// Dispatch every event of a batch, in order, to completion.
    pub async fn dispatch(&self, events: &[Value]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, raw) in events.iter().enumerate() {
            let event = match classify(raw) {
                Ok(event) => event,
                Err(e) => {
                    error!(index, stage = %DispatchStage::Classify, error = %e, "handle event");
                    report.failures.push(DispatchFailure {
                        index,
                        stage: DispatchStage::Classify,
                        error: e,
                    });
                    continue;
                }
            };

            let kind = event.kind();
            // Clone the handler out so the lock is not held across the await.
            let handler = self.registry.read().await.get(kind);
            let Some(handler) = handler else {
                debug!(index, kind = %kind, "No handler registered; skipping event");
                report.unhandled += 1;
                continue;
            };

            let webhook_event_id = event.webhook_event_id().to_string();
            match handler(event).await {
                Ok(()) => report.handled += 1,
                Err(source) => {
                    let e = DispatchError::Handler { kind, source };
                    error!(
                        index,
                        stage = %DispatchStage::Handle,
                        webhook_event_id = %webhook_event_id,
                        error = %e,
                        "handle event"
                    );
                    report.failures.push(DispatchFailure {
                        index,
                        stage: DispatchStage::Handle,
                        error: e,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
