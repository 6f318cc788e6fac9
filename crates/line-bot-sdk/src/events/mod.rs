//! Typed LINE webhook events.
//!
//! Every supported event is a [`WebhookEvent`] envelope (event id, source,
//! timestamp) around a kind-specific payload. The closed set of supported
//! kinds is modelled by [`Event`] and keyed by [`EventKind`].
//!
//! # Examples
//!
//! ```rust
//! use line_bot_sdk::events::{Event, EventKind, JoinData, Source, WebhookEvent};
//!
//! let event = Event::Join(WebhookEvent {
//!     webhook_event_id: "01H8Z".to_string(),
//!     source: Source::User { user_id: "U1".to_string() },
//!     timestamp: 1_700_000_000_000,
//!     data: JoinData { reply_token: "token".to_string() },
//! });
//!
//! assert_eq!(event.kind(), EventKind::Join);
//! assert_eq!(event.source().user_id(), Some("U1"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod raw;
pub mod source;

pub use raw::{CallbackRequest, RawEvent, RawMembers, RawMessageContent, RawSource};
pub use source::{resolve_source, Source, SourceKind};

// ============================================================================
// Event Kind
// ============================================================================

/// The fixed set of event kinds the SDK dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Join,
    Leave,
    MemberJoined,
    MemberLeft,
    Message,
}

impl EventKind {
    /// Number of supported kinds.
    pub const COUNT: usize = 5;

    /// All kinds, in slot order.
    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Join,
        EventKind::Leave,
        EventKind::MemberJoined,
        EventKind::MemberLeft,
        EventKind::Message,
    ];

    /// Wire name used by the provider in the event `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::MemberJoined => "memberJoined",
            Self::MemberLeft => "memberLeft",
            Self::Message => "message",
        }
    }

    /// Parse a provider wire name. Returns `None` for unsupported kinds.
    pub fn from_wire(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    pub(crate) fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Envelope and Payloads
// ============================================================================

/// Common envelope shared by every event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent<D> {
    /// Provider-assigned webhook event id
    pub webhook_event_id: String,

    /// Conversation the event originated from
    pub source: Source,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Kind-specific payload
    pub data: D,
}

impl<D> WebhookEvent<D> {
    /// Event time as a UTC timestamp, if the millisecond value is representable.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// The bot joined a group or room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinData {
    pub reply_token: String,
}

/// The bot left a group or room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveData {}

/// Users joined a group or room the bot is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberJoinedData {
    pub reply_token: String,

    /// User ids in the order the provider listed them
    pub joined_member_ids: Vec<String>,
}

/// Users left a group or room the bot is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLeftData {
    /// User ids in the order the provider listed them
    pub left_member_ids: Vec<String>,
}

/// A text message was sent to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub reply_token: String,
    pub message_id: String,
    pub text: String,

    /// Token for quoting this message in a reply
    pub quote_token: String,

    /// Id of the message this one quotes, if any
    pub quoted_message_id: Option<String>,
}

pub type JoinEvent = WebhookEvent<JoinData>;
pub type LeaveEvent = WebhookEvent<LeaveData>;
pub type MemberJoinedEvent = WebhookEvent<MemberJoinedData>;
pub type MemberLeftEvent = WebhookEvent<MemberLeftData>;
pub type MessageEvent = WebhookEvent<MessageData>;

// ============================================================================
// Event Sum Type
// ============================================================================

/// A classified webhook event of one of the supported kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Join(JoinEvent),
    Leave(LeaveEvent),
    MemberJoined(MemberJoinedEvent),
    MemberLeft(MemberLeftEvent),
    Message(MessageEvent),
}

impl Event {
    /// Kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Join(_) => EventKind::Join,
            Self::Leave(_) => EventKind::Leave,
            Self::MemberJoined(_) => EventKind::MemberJoined,
            Self::MemberLeft(_) => EventKind::MemberLeft,
            Self::Message(_) => EventKind::Message,
        }
    }

    /// Provider-assigned webhook event id.
    pub fn webhook_event_id(&self) -> &str {
        match self {
            Self::Join(e) => &e.webhook_event_id,
            Self::Leave(e) => &e.webhook_event_id,
            Self::MemberJoined(e) => &e.webhook_event_id,
            Self::MemberLeft(e) => &e.webhook_event_id,
            Self::Message(e) => &e.webhook_event_id,
        }
    }

    /// Source of the event.
    pub fn source(&self) -> &Source {
        match self {
            Self::Join(e) => &e.source,
            Self::Leave(e) => &e.source,
            Self::MemberJoined(e) => &e.source,
            Self::MemberLeft(e) => &e.source,
            Self::Message(e) => &e.source,
        }
    }
}

/// Typed events that occupy a single handler slot.
///
/// Implemented for the five envelope aliases so the handler registry can
/// store type-erased handlers keyed by [`EventKind`].
pub trait KindedEvent: Sized + Send + 'static {
    /// Slot this event type is dispatched to.
    const KIND: EventKind;

    /// Extract the typed event from the sum type.
    fn from_event(event: Event) -> Option<Self>;
}

macro_rules! kinded_event {
    ($ty:ty, $variant:ident) => {
        impl KindedEvent for $ty {
            const KIND: EventKind = EventKind::$variant;

            fn from_event(event: Event) -> Option<Self> {
                match event {
                    Event::$variant(e) => Some(e),
                    _ => None,
                }
            }
        }
    };
}

kinded_event!(JoinEvent, Join);
kinded_event!(LeaveEvent, Leave);
kinded_event!(MemberJoinedEvent, MemberJoined);
kinded_event!(MemberLeftEvent, MemberLeft);
kinded_event!(MessageEvent, Message);

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
