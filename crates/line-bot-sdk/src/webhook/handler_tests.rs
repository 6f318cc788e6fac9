//! Tests for the handler registry.

use super::*;
use crate::events::{JoinData, LeaveData, MessageData, Source, WebhookEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

fn join_event() -> Event {
    Event::Join(WebhookEvent {
        webhook_event_id: "e-join".to_string(),
        source: Source::User {
            user_id: "U1".to_string(),
        },
        timestamp: 0,
        data: JoinData {
            reply_token: "r".to_string(),
        },
    })
}

fn message_event(text: &str) -> Event {
    Event::Message(WebhookEvent {
        webhook_event_id: "e-message".to_string(),
        source: Source::User {
            user_id: "U1".to_string(),
        },
        timestamp: 0,
        data: MessageData {
            reply_token: "r".to_string(),
            message_id: "m".to_string(),
            text: text.to_string(),
            quote_token: "q".to_string(),
            quoted_message_id: None,
        },
    })
}

#[test]
fn test_new_registry_has_no_handlers() {
    let registry = HandlerRegistry::new();

    for kind in EventKind::ALL {
        assert!(!registry.is_registered(kind));
        assert!(registry.get(kind).is_none());
    }
}

#[test]
fn test_each_setter_fills_only_its_slot() {
    let mut registry = HandlerRegistry::new();
    registry.set_member_left_handler(|_| async { Ok(()) });

    assert!(registry.is_registered(EventKind::MemberLeft));
    for kind in [
        EventKind::Join,
        EventKind::Leave,
        EventKind::MemberJoined,
        EventKind::Message,
    ] {
        assert!(!registry.is_registered(kind), "{kind} should be empty");
    }
}

#[test]
fn test_all_setters_register_their_kind() {
    let mut registry = HandlerRegistry::new();
    registry.set_join_handler(|_| async { Ok(()) });
    registry.set_leave_handler(|_| async { Ok(()) });
    registry.set_member_joined_handler(|_| async { Ok(()) });
    registry.set_member_left_handler(|_| async { Ok(()) });
    registry.set_message_handler(|_| async { Ok(()) });

    for kind in EventKind::ALL {
        assert!(registry.is_registered(kind));
    }
}

#[tokio::test]
async fn test_registered_handler_receives_typed_event() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut registry = HandlerRegistry::new();

    let sink = seen.clone();
    registry.set_message_handler(move |event: MessageEvent| {
        let sink = sink.clone();
        async move {
            sink.lock().await.push(event.data.text);
            Ok(())
        }
    });

    let handler = registry.get(EventKind::Message).expect("handler registered");
    handler(message_event("hi")).await.unwrap();

    assert_eq!(*seen.lock().await, vec!["hi".to_string()]);
}

#[tokio::test]
async fn test_second_registration_replaces_first() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let mut registry = HandlerRegistry::new();

    let counter = first.clone();
    registry.set_join_handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    });
    let counter = second.clone();
    registry.set_join_handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    });

    let handler = registry.get(EventKind::Join).unwrap();
    handler(join_event()).await.unwrap();
    handler(join_event()).await.unwrap();

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_handler_error_is_passed_through() {
    let mut registry = HandlerRegistry::new();
    registry.set_leave_handler(|_event: WebhookEvent<LeaveData>| async {
        Err::<(), HandlerError>("leave failed".into())
    });

    let handler = registry.get(EventKind::Leave).unwrap();
    let leave = Event::Leave(WebhookEvent {
        webhook_event_id: "e".to_string(),
        source: Source::Unknown,
        timestamp: 0,
        data: LeaveData {},
    });

    let error = handler(leave).await.unwrap_err();
    assert_eq!(error.to_string(), "leave failed");
}

#[test]
fn test_debug_lists_registered_kinds() {
    let mut registry = HandlerRegistry::new();
    registry.set_message_handler(|_| async { Ok(()) });

    let debug = format!("{:?}", registry);
    assert!(debug.contains("Message"));
    assert!(!debug.contains("Join"));
}
