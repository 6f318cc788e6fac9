//! # LINE Bot SDK
//!
//! Building blocks for LINE Messaging API bots.
//!
//! This SDK provides:
//! - Webhook signature validation
//! - Typed join, leave, member and text message events
//! - A per-kind handler registry and an in-order event dispatcher
//! - A Messaging API client and a [`Notifier`](notifier::Notifier) for
//!   replies and pushes with quoting and mentions
//!
//! # Examples
//!
//! ## Echo Bot
//!
//! ```rust,no_run
//! use line_bot_sdk::client::ClientConfig;
//! use line_bot_sdk::events::MessageEvent;
//! use line_bot_sdk::notifier::{LineNotifier, Notifier, NotifyOptions};
//! use line_bot_sdk::webhook::WebhookReceiver;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = Arc::new(LineNotifier::connect("access-token", ClientConfig::default()).await?);
//! let receiver = WebhookReceiver::new("channel-secret");
//!
//! receiver
//!     .set_message_handler(move |event: MessageEvent| {
//!         let notifier = notifier.clone();
//!         async move {
//!             let options = NotifyOptions::default().with_quote_token(event.data.quote_token.clone());
//!             notifier.reply(&event.data.reply_token, &event.data.text, &options).await?;
//!             Ok::<(), line_bot_sdk::HandlerError>(())
//!         }
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod client;
pub mod error;
pub mod events;
pub mod notifier;
pub mod webhook;

// Re-export commonly used types at crate root for convenience
pub use error::{ApiError, DispatchError, HandlerError, NotifierError, ValidationError};

pub use events::{
    Event, EventKind, JoinEvent, LeaveEvent, MemberJoinedEvent, MemberLeftEvent, MessageEvent,
    Source, WebhookEvent,
};

pub use client::{ClientConfig, MessagingClient};
pub use notifier::{LineNotifier, MessageId, Notifier, NotifyOptions};
pub use webhook::{
    DispatchReport, HandlerRegistry, SignatureValidator, WebhookReceiver, WebhookRequest,
    WebhookResponse,
};
