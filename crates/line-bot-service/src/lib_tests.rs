//! Router tests for the callback and health endpoints.

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use line_bot_sdk::events::MessageEvent;
use line_bot_sdk::webhook::{SignatureValidator, SIGNATURE_HEADER};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use zeroize::Zeroizing;

const SECRET: &str = "router-test-secret";

fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.channel.channel_secret = Zeroizing::new(SECRET.to_string());
    config.channel.channel_access_token = Zeroizing::new("token".to_string());
    config
}

fn router_with(receiver: Arc<WebhookReceiver>) -> Router {
    create_router(AppState::new(test_config(), receiver))
}

fn message_body(text: &str) -> String {
    json!({
        "destination": "Ubot",
        "events": [{
            "type": "message",
            "timestamp": 1700000000000_i64,
            "source": {"type": "user", "userId": "U1"},
            "webhookEventId": "01MSG",
            "replyToken": "reply-token",
            "message": {"type": "text", "id": "100", "text": text, "quoteToken": "q"}
        }]
    })
    .to_string()
}

fn callback_request(body: String, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/callback")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body)).unwrap()
}

fn sign(body: &str) -> String {
    SignatureValidator::new(SECRET).sign(body.as_bytes()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signed_callback_is_dispatched() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    receiver
        .set_message_handler(move |event: MessageEvent| {
            let counter = counter.clone();
            async move {
                assert_eq!(event.data.text, "hi");
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), line_bot_sdk::HandlerError>(())
            }
        })
        .await;

    let body = message_body("hi");
    let signature = sign(&body);
    let response = router_with(receiver)
        .oneshot(callback_request(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let json = json_body(response).await;
    assert_eq!(json["handled"], 1);
    assert_eq!(json["failed"], 0);
}

#[tokio::test]
async fn test_missing_signature_is_bad_request() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));

    let response = router_with(receiver)
        .oneshot(callback_request(message_body("hi"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_signature_from_other_secret_is_bad_request() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));
    let body = message_body("hi");
    let signature = SignatureValidator::new("other")
        .sign(body.as_bytes())
        .unwrap();

    let response = router_with(receiver)
        .oneshot(callback_request(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparseable_body_is_internal_error() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));
    let body = "not json".to_string();
    let signature = sign(&body);

    let response = router_with(receiver)
        .oneshot(callback_request(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_handler_failure_still_returns_ok() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));
    receiver
        .set_message_handler(|_event: MessageEvent| async move {
            Err::<(), line_bot_sdk::HandlerError>("downstream unavailable".into())
        })
        .await;

    let body = message_body("hi");
    let signature = sign(&body);
    let response = router_with(receiver)
        .oneshot(callback_request(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["failed"], 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));
    let mut config = test_config();
    config.server.max_body_size = 16;
    let router = create_router(AppState::new(config, receiver));

    let body = message_body("this body is larger than sixteen bytes");
    let signature = sign(&body);
    let response = router
        .oneshot(callback_request(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_check() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));

    let response = router_with(receiver)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["pay_enabled"], false);
}

#[tokio::test]
async fn test_callback_rejects_get() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));

    let response = router_with(receiver)
        .oneshot(
            Request::builder()
                .uri("/callback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_custom_callback_path() {
    let receiver = Arc::new(WebhookReceiver::new(SECRET));
    let mut config = test_config();
    config.webhook.callback_path = "/line/callback".to_string();
    let router = create_router(AppState::new(config, receiver));

    let body = message_body("hi");
    let signature = sign(&body);
    let request = Request::builder()
        .method("POST")
        .uri("/line/callback")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// LINE Pay wiring
// ============================================================================

#[test]
fn test_build_pay_client_without_pay_section() {
    let client = build_pay_client(&test_config()).unwrap();
    assert!(client.is_none());
}

#[test]
fn test_build_pay_client_from_pay_section() {
    let mut config = test_config();
    config.pay = Some(config::PaySettings {
        channel_id: "1657000000".to_string(),
        channel_secret: Zeroizing::new("pay-secret".to_string()),
        ..config::PaySettings::default()
    });

    let client = build_pay_client(&config).unwrap().expect("pay client");
    assert_eq!(client.config().channel_id, "1657000000");
    assert_eq!(client.config().base_url(), line_pay::SANDBOX_BASE_URL);
}

#[tokio::test]
async fn test_health_reports_pay_client() {
    let mut config = test_config();
    config.pay = Some(config::PaySettings {
        channel_id: "1657000000".to_string(),
        channel_secret: Zeroizing::new("pay-secret".to_string()),
        ..config::PaySettings::default()
    });
    let client = build_pay_client(&config).unwrap().expect("pay client");
    let state =
        AppState::new(config, Arc::new(WebhookReceiver::new(SECRET))).with_pay_client(client);
    assert!(state.pay_client().is_some());

    let response = create_router(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["pay_enabled"], true);
}

// ============================================================================
// Graceful shutdown
// ============================================================================

fn slow_router() -> Router {
    Router::new().route(
        "/slow",
        axum::routing::post(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            "done"
        }),
    )
}

#[tokio::test]
async fn test_shutdown_without_requests_completes() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_until(
        listener,
        slow_router(),
        async move {
            let _ = rx.await;
        },
        std::time::Duration::from_secs(5),
    ));

    tx.send(()).unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(2), server)
        .await
        .expect("server stops promptly")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_shutdown_timeout_bounds_in_flight_drain() {
    use tokio::io::AsyncWriteExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_until(
        listener,
        slow_router(),
        async move {
            let _ = rx.await;
        },
        std::time::Duration::from_millis(200),
    ));

    // Start a request whose handler outlives the drain deadline.
    let mut stream = tokio::net::TcpStream::connect(address).await.unwrap();
    stream
        .write_all(b"POST /slow HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\n\r\n")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let started = std::time::Instant::now();
    tx.send(()).unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
        .await
        .expect("drain is bounded by the shutdown timeout")
        .unwrap();

    assert!(result.is_ok());
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    drop(stream);
}
