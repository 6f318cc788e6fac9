//! Handler registry for application-provided event processing logic.
//!
//! The registry holds at most one handler per [`EventKind`]. Registering a
//! handler for a kind that already has one replaces it; there is no
//! multi-subscriber fan-out. Kinds without a handler are treated as handled.
//!
//! # Examples
//!
//! ```rust
//! use line_bot_sdk::events::{EventKind, MessageEvent};
//! use line_bot_sdk::webhook::HandlerRegistry;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.set_message_handler(|event: MessageEvent| async move {
//!     println!("received: {}", event.data.text);
//!     Ok(())
//! });
//!
//! assert!(registry.is_registered(EventKind::Message));
//! assert!(!registry.is_registered(EventKind::Join));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::events::{
    Event, EventKind, JoinEvent, KindedEvent, LeaveEvent, MemberJoinedEvent, MemberLeftEvent,
    MessageEvent,
};

/// Future returned by a type-erased handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

/// Type-erased handler stored in a registry slot.
pub type EventHandler = Arc<dyn Fn(Event) -> HandlerFuture + Send + Sync>;

/// Fixed table of optional handlers, one slot per [`EventKind`].
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    slots: [Option<EventHandler>; EventKind::COUNT],
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for events of type `E`, replacing any previous one.
    pub fn set_handler<E, F, Fut>(&mut self, handler: F)
    where
        E: KindedEvent,
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let erased: EventHandler = Arc::new(move |event: Event| -> HandlerFuture {
            match E::from_event(event) {
                Some(typed) => Box::pin(handler(typed)),
                // Slot lookup is keyed by the event's own kind, so this arm is
                // only reachable by calling the handler directly.
                None => Box::pin(async { Ok(()) }),
            }
        });
        self.slots[E::KIND.slot()] = Some(erased);
    }

    /// Set the handler for join events.
    pub fn set_join_handler<F, Fut>(&mut self, handler: F)
    where
        F: Fn(JoinEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.set_handler(handler);
    }

    /// Set the handler for leave events.
    pub fn set_leave_handler<F, Fut>(&mut self, handler: F)
    where
        F: Fn(LeaveEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.set_handler(handler);
    }

    /// Set the handler for member joined events.
    pub fn set_member_joined_handler<F, Fut>(&mut self, handler: F)
    where
        F: Fn(MemberJoinedEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.set_handler(handler);
    }

    /// Set the handler for member left events.
    pub fn set_member_left_handler<F, Fut>(&mut self, handler: F)
    where
        F: Fn(MemberLeftEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.set_handler(handler);
    }

    /// Set the handler for text message events.
    pub fn set_message_handler<F, Fut>(&mut self, handler: F)
    where
        F: Fn(MessageEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.set_handler(handler);
    }

    /// Check whether a handler is registered for `kind`.
    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    /// Handler registered for `kind`, if any.
    pub fn get(&self, kind: EventKind) -> Option<EventHandler> {
        self.slots[kind.slot()].clone()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<EventKind> = EventKind::ALL
            .into_iter()
            .filter(|k| self.is_registered(*k))
            .collect();
        f.debug_struct("HandlerRegistry")
            .field("registered", &registered)
            .finish()
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
