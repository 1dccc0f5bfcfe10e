//! Integration tests for the Bot API bridge against a mock platform
//! endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use gigram_telegram::{BotApi, SendMessageOptions, TelegramError};

const TOKEN: &str = "123456789:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, Clone)]
struct CapturedRequest {
    path: String,
    body: serde_json::Value,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<CapturedRequest>>,
    responses: Mutex<VecDeque<serde_json::Value>>,
}

struct MockBotApi {
    base_url: String,
    state: Arc<MockState>,
}

impl MockBotApi {
    async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(any(capture))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock bot api");
        let addr = listener.local_addr().expect("mock bot api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock bot api");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    fn bot(&self) -> BotApi {
        BotApi::new(Some(TOKEN.to_string())).with_base_url(&self.base_url)
    }

    fn respond(&self, envelope: serde_json::Value) {
        self.state.responses.lock().unwrap().push_back(envelope);
    }

    fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn capture(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    state.requests.lock().unwrap().push(CapturedRequest {
        path: parts.uri.path().to_string(),
        body,
    });

    let envelope = state
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| serde_json::json!({ "ok": false, "description": "no scripted response" }));

    Response::builder()
        .header("content-type", "application/json")
        .body(envelope.to_string().into())
        .expect("build mock response")
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_me_hits_the_token_scoped_path() {
    let mock = MockBotApi::start().await;
    mock.respond(serde_json::json!({
        "ok": true,
        "result": { "id": 123456789, "is_bot": true, "first_name": "Gigram", "username": "gigram_bot" }
    }));

    let info = mock.bot().get_me().await.unwrap();
    assert_eq!(info.id, 123_456_789);
    assert!(info.is_bot);
    assert_eq!(info.username.as_deref(), Some("gigram_bot"));

    let requests = mock.requests();
    assert_eq!(requests[0].path, format!("/bot{TOKEN}/getMe"));
}

#[tokio::test]
async fn a_non_ok_envelope_carries_the_platform_description() {
    let mock = MockBotApi::start().await;
    mock.respond(serde_json::json!({ "ok": false, "description": "Unauthorized" }));

    let err = mock.bot().get_me().await.unwrap_err();
    assert_matches!(err, TelegramError::Api { ref description } if description == "Unauthorized");
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_message_posts_chat_text_and_options() {
    let mock = MockBotApi::start().await;
    mock.respond(serde_json::json!({ "ok": true, "result": { "message_id": 7 } }));

    let options = SendMessageOptions {
        parse_mode: Some("MarkdownV2".into()),
        disable_notification: Some(true),
    };
    let sent = mock
        .bot()
        .send_message(42, "New application received", Some(options))
        .await
        .unwrap();
    assert_eq!(sent.message_id, 7);

    let request = &mock.requests()[0];
    assert_eq!(request.path, format!("/bot{TOKEN}/sendMessage"));
    assert_eq!(request.body["chat_id"], 42);
    assert_eq!(request.body["text"], "New application received");
    assert_eq!(request.body["parse_mode"], "MarkdownV2");
    assert_eq!(request.body["disable_notification"], true);
}

// ---------------------------------------------------------------------------
// Webhook registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_webhook_scopes_the_allowed_updates() {
    let mock = MockBotApi::start().await;
    mock.respond(serde_json::json!({ "ok": true, "result": true }));

    let registered = mock
        .bot()
        .set_webhook("https://app.example.com/webhook")
        .await
        .unwrap();
    assert!(registered);

    let request = &mock.requests()[0];
    assert_eq!(request.path, format!("/bot{TOKEN}/setWebhook"));
    assert_eq!(request.body["url"], "https://app.example.com/webhook");
    assert_eq!(
        request.body["allowed_updates"],
        serde_json::json!(["message", "callback_query", "web_app_data"])
    );
}

// ---------------------------------------------------------------------------
// Update polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_updates_returns_raw_update_payloads() {
    let mock = MockBotApi::start().await;
    mock.respond(serde_json::json!({
        "ok": true,
        "result": [
            { "update_id": 100, "message": { "text": "/start" } },
            { "update_id": 101, "callback_query": { "data": "apply" } }
        ]
    }));

    let updates = mock.bot().get_updates(Some(99)).await.unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].update_id, 100);
    assert_eq!(updates[0].payload["message"]["text"], "/start");
    assert_eq!(updates[1].payload["callback_query"]["data"], "apply");

    let request = &mock.requests()[0];
    assert_eq!(request.body["offset"], 99);
}
