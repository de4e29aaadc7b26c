//! Mock `OpenAI` chat completions backend for integration tests

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use mosaic_config::OpenAiConfig;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Bearer token the mock accepts
pub const TEST_KEY: &str = "sk-test";

/// Mock `OpenAI` backend returning a fixed reply
pub struct MockOpenAi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockOpenAiState>,
}

struct MockOpenAiState {
    /// Content of the first choice; `None` replies with null content
    content: Option<String>,
    requests: Mutex<Vec<Value>>,
}

impl MockOpenAi {
    /// Start a mock replying with the given content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(Some(content.to_owned())).await
    }

    /// Start a mock whose replies carry null content
    pub async fn start_with_null_content() -> anyhow::Result<Self> {
        Self::start_inner(None).await
    }

    async fn start_inner(content: Option<String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockOpenAiState {
            content,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
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

    /// Client settings pointing at this mock
    ///
    /// The base URL includes `/v1` since the client appends `/chat/completions`
    pub fn config(&self) -> OpenAiConfig {
        OpenAiConfig::default()
            .with_api_key(TEST_KEY)
            .with_base_url(format!("http://{}/v1", self.addr).parse().expect("valid URL"))
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockOpenAi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockOpenAiState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let expected = format!("Bearer {TEST_KEY}");
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error"
                }
            })),
        )
            .into_response();
    }

    let model = body["model"].clone();
    state.requests.lock().unwrap().push(body);

    Json(json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": state.content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    }))
    .into_response()
}
