use super::*;
use serde_json::json;

#[test]
fn test_text_v2_with_mention_serializes_to_wire_shape() {
    let message = Message::TextV2 {
        text: "Hi {a}".to_string(),
        substitution: BTreeMap::from([("a".to_string(), SubstitutionObject::user_mention("U2"))]),
        quote_token: Some("qt".to_string()),
    };

    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "type": "textV2",
            "text": "Hi {a}",
            "substitution": {
                "a": {"type": "mention", "mentionee": {"type": "user", "userId": "U2"}}
            },
            "quoteToken": "qt"
        })
    );
}

#[test]
fn test_plain_text_v2_omits_empty_fields() {
    let message = Message::TextV2 {
        text: "hello".to_string(),
        substitution: BTreeMap::new(),
        quote_token: None,
    };

    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({"type": "textV2", "text": "hello"})
    );
}

#[test]
fn test_reply_request_uses_camel_case() {
    let request = ReplyMessageRequest::new("token", vec![]);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"replyToken": "token", "messages": [], "notificationDisabled": false})
    );
}

#[test]
fn test_push_request_targets_id() {
    let request = PushMessageRequest::new("C123", vec![]);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["to"], "C123");
}

#[test]
fn test_sent_messages_response_decodes() {
    let response: SentMessagesResponse = serde_json::from_value(json!({
        "sentMessages": [{"id": "461230966842064897", "quoteToken": "IStG5h1Tz7b"}]
    }))
    .unwrap();

    assert_eq!(response.sent_messages.len(), 1);
    assert_eq!(response.sent_messages[0].id, "461230966842064897");
    assert_eq!(
        response.sent_messages[0].quote_token.as_deref(),
        Some("IStG5h1Tz7b")
    );
}

#[test]
fn test_sent_messages_response_tolerates_missing_list() {
    let response: SentMessagesResponse = serde_json::from_str("{}").unwrap();
    assert!(response.sent_messages.is_empty());
}

#[test]
fn test_bot_info_decodes_minimal_body() {
    let info: BotInfo = serde_json::from_value(json!({
        "userId": "Ubot",
        "basicId": "@216ru...",
        "displayName": "Example bot",
        "chatMode": "bot",
        "markAsReadMode": "auto"
    }))
    .unwrap();

    assert_eq!(info.user_id, "Ubot");
    assert_eq!(info.display_name, "Example bot");
    assert_eq!(info.premium_id, None);
    assert_eq!(info.chat_mode.as_deref(), Some("bot"));
}
