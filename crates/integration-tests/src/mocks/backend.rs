use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};

/// Builder for an inference backend mock serving `POST /chat`.
pub struct BackendMock {
    behavior: Behavior,
}

#[derive(Clone)]
enum Behavior {
    Echo,
    Reply(String),
    Status(StatusCode),
    Raw(String),
}

impl Default for BackendMock {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendMock {
    /// Answers `Echo: <message>` by default.
    pub fn new() -> Self {
        Self { behavior: Behavior::Echo }
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.behavior = Behavior::Reply(reply.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.behavior = Behavior::Status(StatusCode::from_u16(status).unwrap());
        self
    }

    /// Answers 200 with the given body as-is.
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.behavior = Behavior::Raw(body.into());
        self
    }

    pub async fn spawn(self) -> anyhow::Result<TestBackend> {
        let state = Arc::new(MockState {
            behavior: self.behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().route("/chat", post(chat)).with_state(state.clone());
        let (address, _handle) = super::spawn_router(app).await?;

        Ok(TestBackend {
            address,
            state,
            _handle,
        })
    }
}

/// A running inference backend mock.
pub struct TestBackend {
    pub address: SocketAddr,
    state: Arc<MockState>,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestBackend {
    /// The value for `relay.backend.url`.
    pub fn url(&self) -> String {
        format!("http://{}/chat", self.address)
    }

    /// The value for `gateway.proxy.target`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Bodies of every request received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<Value>>,
}

async fn chat(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let message = body["message"].as_str().unwrap_or("<none>").to_string();
    state.requests.lock().unwrap().push(body);

    match &state.behavior {
        Behavior::Echo => Json(json!({ "response": format!("Echo: {message}") })).into_response(),
        Behavior::Reply(reply) => Json(json!({ "response": reply })).into_response(),
        Behavior::Status(status) => (*status, Json(json!({ "detail": "backend failure" }))).into_response(),
        Behavior::Raw(body) => (StatusCode::OK, body.clone()).into_response(),
    }
}
