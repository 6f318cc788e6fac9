//! LINE webhook verification and event dispatch.
//!
//! # Core Components
//!
//! - [`SignatureValidator`] - HMAC-SHA256 signature validation
//! - [`HandlerRegistry`] - One optional handler per event kind
//! - [`EventDispatcher`] - Classifies raw events and runs their handlers
//! - [`WebhookReceiver`] - HTTP intake: verify, decode, dispatch
//! - [`WebhookRequest`]/[`WebhookResponse`] - HTTP request/response types
//!
//! # Processing Model
//!
//! A callback carries a batch of events. After the signature is verified the
//! events are dispatched one by one in the order the provider sent them, and
//! the HTTP response is produced only when the whole batch has been handled.
//! Unsupported or malformed events and failing handlers are logged and
//! skipped; the rest of the batch still runs.
//!
//! # Security
//!
//! Signatures are compared in constant time. The channel secret is never
//! logged and is zeroed when the validator is dropped.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use line_bot_sdk::events::{JoinEvent, MessageEvent};
//! use line_bot_sdk::webhook::{WebhookReceiver, WebhookRequest};
//! use std::collections::HashMap;
//!
//! # async fn example(headers: HashMap<String, String>, body: bytes::Bytes) {
//! let receiver = WebhookReceiver::new("channel-secret");
//!
//! receiver
//!     .set_join_handler(|event: JoinEvent| async move {
//!         println!("joined {:?}", event.source);
//!         Ok(())
//!     })
//!     .await;
//! receiver
//!     .set_message_handler(|event: MessageEvent| async move {
//!         println!("{} said {}", event.source.user_id().unwrap_or("?"), event.data.text);
//!         Ok(())
//!     })
//!     .await;
//!
//! let response = receiver.receive_webhook(WebhookRequest::new(headers, body)).await;
//! assert!(response.is_success());
//! # }
//! ```

pub mod dispatcher;
pub mod handler;
pub mod receiver;
pub mod validation;

pub use dispatcher::{classify, DispatchFailure, DispatchReport, DispatchStage, EventDispatcher};
pub use handler::{EventHandler, HandlerFuture, HandlerRegistry};
pub use receiver::{WebhookReceiver, WebhookRequest, WebhookResponse, SIGNATURE_HEADER};
pub use validation::SignatureValidator;
