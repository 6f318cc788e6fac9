//! Tests for the outbound notifier.

use super::*;
use crate::error::ApiError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier_for(server: &MockServer) -> LineNotifier {
    let config = ClientConfig::default().with_api_base_url(server.uri());
    LineNotifier::from_client(MessagingClient::new("token", config).unwrap(), "Ubot")
}

// ============================================================================
// build_text_message
// ============================================================================

#[test]
fn test_build_text_message_without_options() {
    let message = build_text_message("hello", &NotifyOptions::default());

    assert_eq!(
        message,
        Message::TextV2 {
            text: "hello".to_string(),
            substitution: BTreeMap::new(),
            quote_token: None,
        }
    );
}

#[test]
fn test_build_text_message_maps_each_mention() {
    let options = NotifyOptions::default()
        .with_mention("a", "U2")
        .with_mention("b", "U3");

    let Message::TextV2 { substitution, .. } = build_text_message("Hi {a} and {b}", &options);

    assert_eq!(substitution.len(), 2);
    assert_eq!(substitution["a"], SubstitutionObject::user_mention("U2"));
    assert_eq!(substitution["b"], SubstitutionObject::user_mention("U3"));
}

#[test]
fn test_build_text_message_ignores_empty_quote_token() {
    let options = NotifyOptions::default().with_quote_token("");

    let Message::TextV2 { quote_token, .. } = build_text_message("x", &options);
    assert_eq!(quote_token, None);
}

#[test]
fn test_message_id_display() {
    let id = MessageId::new("461230966842064897");

    assert_eq!(id.to_string(), "461230966842064897");
    assert_eq!(id.as_str(), "461230966842064897");
}

// ============================================================================
// LineNotifier
// ============================================================================

#[tokio::test]
async fn test_connect_records_bot_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/bot/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "Ubot123",
            "basicId": "@bot",
            "displayName": "Bot"
        })))
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_api_base_url(server.uri());
    let notifier = LineNotifier::connect("token", config).await.unwrap();

    assert_eq!(notifier.bot_user_id(), "Ubot123");
}

#[tokio::test]
async fn test_connect_fails_when_bot_lookup_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/bot/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_api_base_url(server.uri());
    let error = LineNotifier::connect("bad-token", config).await.unwrap_err();

    assert!(matches!(
        error,
        NotifierError::Provider(ApiError::HttpError { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_reply_with_mention_and_quote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .and(body_partial_json(json!({
            "replyToken": "rt",
            "messages": [{
                "type": "textV2",
                "text": "Hi {a}",
                "substitution": {
                    "a": {"type": "mention", "mentionee": {"type": "user", "userId": "U2"}}
                },
                "quoteToken": "qt"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sentMessages": [{"id": "M1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = NotifyOptions::default()
        .with_quote_token("qt")
        .with_mention("a", "U2");
    let id = notifier_for(&server)
        .reply("rt", "Hi {a}", &options)
        .await
        .unwrap();

    assert_eq!(id, MessageId::new("M1"));
}

#[tokio::test]
async fn test_send_returns_first_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/push"))
        .and(body_partial_json(json!({"to": "C1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sentMessages": [{"id": "M7"}, {"id": "M8"}]
        })))
        .mount(&server)
        .await;

    let id = notifier_for(&server)
        .send("C1", "hello group", &NotifyOptions::default())
        .await
        .unwrap();

    assert_eq!(id.as_str(), "M7");
}

#[tokio::test]
async fn test_empty_sent_messages_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/reply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sentMessages": []})))
        .mount(&server)
        .await;

    let error = notifier_for(&server)
        .reply("rt", "hello", &NotifyOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(error, NotifierError::EmptyResponse));
}

#[tokio::test]
async fn test_provider_rejection_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/bot/message/push"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "The request body has 1 error(s)"})),
        )
        .mount(&server)
        .await;

    let error = notifier_for(&server)
        .send("U1", "hello", &NotifyOptions::default())
        .await
        .unwrap_err();

    match error {
        NotifierError::Provider(ApiError::HttpError { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("1 error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
