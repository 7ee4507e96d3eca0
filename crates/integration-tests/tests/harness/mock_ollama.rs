//! Mock Ollama daemon for integration tests
//!
//! Serves scripted `/api/chat` and `/api/embed` replies and records every
//! request it receives

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// Scripted reply for one endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    /// `200` with a JSON body
    Json(serde_json::Value),
    /// `200` NDJSON body, each string written as its own body chunk
    Chunks(Vec<String>),
    /// Like [`Reply::Chunks`] but the body never ends
    Hang(Vec<String>),
    /// Error status with a raw body
    Error(StatusCode, String),
}

/// Request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

struct MockState {
    chat: Reply,
    embed: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Running mock server, shut down on drop
pub struct MockOllama {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockOllama {
    /// Start a mock whose `/api/chat` answers with `chat`
    pub async fn chat(chat: Reply) -> anyhow::Result<Self> {
        Self::start(chat, not_scripted()).await
    }

    /// Start a mock whose `/api/embed` answers with `embed`
    pub async fn embed(embed: Reply) -> anyhow::Result<Self> {
        Self::start(not_scripted(), embed).await
    }

    async fn start(chat: Reply, embed: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            chat,
            embed,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/chat", routing::post(handle_chat))
            .route("/api/embed", routing::post(handle_embed))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the provider, including `/api`
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The single request received, panicking otherwise
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockOllama {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn not_scripted() -> Reply {
    Reply::Error(StatusCode::NOT_FOUND, r#"{"error":"endpoint not scripted"}"#.to_owned())
}

async fn handle_chat(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    record(&state, "/api/chat", headers, &body);
    reply(state.chat.clone())
}

async fn handle_embed(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    record(&state, "/api/embed", headers, &body);
    reply(state.embed.clone())
}

fn record(state: &MockState, path: &str, headers: HeaderMap, body: &[u8]) {
    let body = serde_json::from_slice(body).unwrap_or(serde_json::Value::Null);
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            path: path.to_owned(),
            headers,
            body,
        });
}

fn reply(reply: Reply) -> Response {
    match reply {
        Reply::Json(value) => (
            [(CONTENT_TYPE, HeaderValue::from_static("application/json")), request_id()],
            value.to_string(),
        )
            .into_response(),
        Reply::Chunks(chunks) => ndjson(Body::from_stream(
            futures::stream::iter(chunks).map(Ok::<_, Infallible>),
        )),
        Reply::Hang(chunks) => ndjson(Body::from_stream(
            futures::stream::iter(chunks)
                .chain(futures::stream::pending())
                .map(Ok::<_, Infallible>),
        )),
        Reply::Error(status, body) => (status, body).into_response(),
    }
}

fn ndjson(body: Body) -> Response {
    (
        [(CONTENT_TYPE, HeaderValue::from_static("application/x-ndjson")), request_id()],
        body,
    )
        .into_response()
}

fn request_id() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-mock-request-id"),
        HeaderValue::from_static("mock-1"),
    )
}
