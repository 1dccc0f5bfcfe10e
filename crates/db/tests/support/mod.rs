#![allow(dead_code)] // each test binary uses a different subset

//! In-process mock of the backend's REST and storage endpoints.
//!
//! Tests script responses in FIFO order and assert against the captured
//! requests afterwards. Every repository call issues a deterministic
//! request sequence, so a queue is all the scripting this needs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;

use gigram_db::{BackendConfig, SupabaseClient};

/// One request the mock received.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    /// Decoded query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    /// First value for a query key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for a header.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("captured body should be JSON")
    }
}

/// One scripted response.
struct ScriptedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<CapturedRequest>>,
    responses: Mutex<VecDeque<ScriptedResponse>>,
}

/// A running mock backend bound to an ephemeral port.
pub struct MockBackend {
    base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(any(capture))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// A client pointed at this mock.
    pub fn client(&self) -> SupabaseClient {
        SupabaseClient::new(BackendConfig::new(&self.base_url, "test-key"))
    }

    /// Script the next response as JSON.
    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.respond(status, &[], body.to_string());
    }

    /// Script the next response with explicit headers and body.
    pub fn respond(&self, status: u16, headers: &[(&str, &str)], body: String) {
        self.state
            .responses
            .lock()
            .unwrap()
            .push_back(ScriptedResponse {
                status,
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body,
            });
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn capture(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let query = parts
        .uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    state.requests.lock().unwrap().push(CapturedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query,
        headers,
        body: bytes.to_vec(),
    });

    let scripted = state.responses.lock().unwrap().pop_front();
    let scripted = scripted.unwrap_or(ScriptedResponse {
        status: 500,
        headers: Vec::new(),
        body: r#"{"message":"no scripted response"}"#.to_string(),
    });

    let mut builder = Response::builder().status(scripted.status);
    for (name, value) in &scripted.headers {
        builder = builder.header(name, value);
    }
    builder
        .body(scripted.body.into())
        .expect("build mock response")
}

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

pub fn profile_json(id: &str, telegram_id: i64, first_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user_id": "00000000-0000-0000-0000-0000000000aa",
        "telegram_id": telegram_id,
        "username": null,
        "first_name": first_name,
        "last_name": null,
        "photo_url": null,
        "role": "freelancer",
        "title": null,
        "description": null,
        "skills": [],
        "hourly_rate": null,
        "location": null,
        "website": null,
        "portfolio": [],
        "rating": 4.2,
        "completed_jobs": 1,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn job_json(id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "client_id": "00000000-0000-0000-0000-0000000000bb",
        "title": title,
        "description": "A job description",
        "category": "Web Development",
        "budget_type": "fixed",
        "budget_amount": 500.0,
        "currency": "USD",
        "skills": ["Rust"],
        "status": "open",
        "deadline": null,
        "created_at": "2024-01-02T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "client": null,
        "applications": null
    })
}

pub fn application_json(id: &str, job_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "job_id": job_id,
        "freelancer_id": "00000000-0000-0000-0000-0000000000cc",
        "proposal": "I can do this.",
        "bid_amount": 450.0,
        "estimated_duration": null,
        "status": status,
        "created_at": "2024-01-03T00:00:00Z",
        "updated_at": "2024-01-03T00:00:00Z",
        "freelancer": null,
        "job": null
    })
}

pub fn message_json(id: &str, job_id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "job_id": job_id,
        "sender_id": "00000000-0000-0000-0000-0000000000dd",
        "receiver_id": "00000000-0000-0000-0000-0000000000ee",
        "content": content,
        "message_type": "text",
        "file_url": null,
        "is_read": false,
        "created_at": "2024-01-04T00:00:00Z",
        "sender": null,
        "receiver": null
    })
}

pub fn payment_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "job_id": "00000000-0000-0000-0000-0000000000ff",
        "application_id": "00000000-0000-0000-0000-000000000011",
        "client_id": "00000000-0000-0000-0000-0000000000bb",
        "freelancer_id": "00000000-0000-0000-0000-0000000000cc",
        "amount": 450.0,
        "currency": "USD",
        "qr_code_url": null,
        "payment_proof_url": null,
        "status": status,
        "notes": null,
        "created_at": "2024-01-05T00:00:00Z",
        "updated_at": "2024-01-05T00:00:00Z",
        "client": null,
        "freelancer": null,
        "job": null
    })
}
