use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};

/// Builder for an OpenAI-compatible completion API mock.
pub struct CompletionMock {
    behavior: Behavior,
}

#[derive(Clone)]
enum Behavior {
    Reply(String),
    Status(StatusCode, String),
    NoChoices,
    NullContent,
    Malformed,
}

/// A request received by the completion mock.
#[derive(Debug, Clone)]
pub struct RecordedCompletion {
    pub authorization: Option<String>,
    pub body: Value,
}

impl RecordedCompletion {
    /// Content of the first message sent to the API.
    pub fn prompt(&self) -> &str {
        self.body["messages"][0]["content"].as_str().unwrap_or_default()
    }
}

impl Default for CompletionMock {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionMock {
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Reply("It's 3:04 PM on Friday, October 16, 2026.".to_string()),
        }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.behavior = Behavior::Reply(reply.into());
        self
    }

    pub fn with_status(mut self, status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.behavior = Behavior::Status(status, body.into());
        self
    }

    pub fn with_no_choices(mut self) -> Self {
        self.behavior = Behavior::NoChoices;
        self
    }

    pub fn with_null_content(mut self) -> Self {
        self.behavior = Behavior::NullContent;
        self
    }

    pub fn with_malformed_body(mut self) -> Self {
        self.behavior = Behavior::Malformed;
        self
    }

    pub async fn spawn(self) -> anyhow::Result<TestCompletionServer> {
        let state = Arc::new(MockState {
            behavior: self.behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let (address, _handle) = super::spawn_router(app).await?;

        Ok(TestCompletionServer {
            address,
            state,
            _handle,
        })
    }
}

/// A running completion API mock.
pub struct TestCompletionServer {
    pub address: SocketAddr,
    state: Arc<MockState>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestCompletionServer {
    /// The value for `relay.completion.base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.address)
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedCompletion> {
        self.state.requests.lock().unwrap().clone()
    }
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedCompletion>>,
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedCompletion { authorization, body });

    match &state.behavior {
        Behavior::Reply(reply) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1677651200,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": reply },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        Behavior::Status(status, body) => (*status, Json(json!({ "error": { "message": body } }))).into_response(),
        Behavior::NoChoices => Json(json!({ "id": "chatcmpl-test", "choices": [] })).into_response(),
        Behavior::NullContent => Json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }]
        }))
        .into_response(),
        Behavior::Malformed => (StatusCode::OK, "<html>upstream hiccup</html>").into_response(),
    }
}
