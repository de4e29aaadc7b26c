//! Mock fal.ai backend for integration tests
//!
//! Serves the synchronous run endpoint under `/run` and the queue under
//! `/queue`, recording every call in arrival order

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use mosaic_config::FalConfig;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// API key the mock accepts
pub const TEST_KEY: &str = "test-key";

/// Number of status polls before a queued job reports completion
const POLLS_UNTIL_COMPLETE: u32 = 3;

/// A request received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Synchronous run of a model
    Run { model_id: String, arguments: Value },
    /// Queue submission
    Submit { model_id: String, arguments: Value },
    /// Status poll
    Status { request_id: String, logs: bool },
    /// Result fetch
    Result { request_id: String },
}

/// Mock fal.ai backend
pub struct MockFal {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockFalState>,
}

struct MockFalState {
    addr: SocketAddr,
    calls: Mutex<Vec<Call>>,
    polls: Mutex<HashMap<String, u32>>,
    submissions: Mutex<HashMap<String, (String, Value)>>,
}

impl MockFal {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockFalState {
            addr,
            calls: Mutex::new(Vec::new()),
            polls: Mutex::new(HashMap::new()),
            submissions: Mutex::new(HashMap::new()),
        });

        let app = Router::new()
            .route("/run/{*model_id}", routing::post(handle_run))
            .route("/queue/{*model_id}", routing::post(handle_submit))
            .route("/requests/{request_id}/status", routing::get(handle_status))
            .route("/requests/{request_id}", routing::get(handle_result))
            .with_state(Arc::clone(&state));

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

    /// Client settings pointing at this mock with a valid key
    pub fn config(&self) -> FalConfig {
        self.config_without_key().with_api_key(TEST_KEY)
    }

    /// Client settings pointing at this mock without credentials
    pub fn config_without_key(&self) -> FalConfig {
        let mut config = FalConfig::for_host("fal.run")
            .expect("valid host")
            .with_poll_interval(Duration::from_millis(5));
        config.run_url = format!("http://{}/run", self.addr).parse().expect("valid URL");
        config.queue_url = format!("http://{}/queue", self.addr).parse().expect("valid URL");
        config
    }

    /// Calls received so far, in arrival order
    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }
}

impl Drop for MockFal {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl MockFalState {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    #[serde(default)]
    logs: u8,
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Key {TEST_KEY}");
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    (!authorized).then(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Authentication required" })),
        )
            .into_response()
    })
}

fn result_for(model_id: &str, arguments: &Value) -> Value {
    json!({
        "images": [{ "url": format!("https://cdn.mock/{model_id}.png"), "width": 1024, "height": 1024 }],
        "prompt": arguments.get("prompt").cloned().unwrap_or(Value::Null),
        "seed": 42
    })
}

// -- Handlers --

async fn handle_run(
    State(state): State<Arc<MockFalState>>,
    Path(model_id): Path<String>,
    headers: HeaderMap,
    Json(arguments): Json<Value>,
) -> Response {
    if let Some(response) = unauthorized(&headers) {
        return response;
    }

    if model_id.ends_with("/reject") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "prompt"], "msg": "field required" }] })),
        )
            .into_response();
    }

    let response = result_for(&model_id, &arguments);
    state.record(Call::Run { model_id, arguments });

    Json(response).into_response()
}

async fn handle_submit(
    State(state): State<Arc<MockFalState>>,
    Path(model_id): Path<String>,
    headers: HeaderMap,
    Json(arguments): Json<Value>,
) -> Response {
    if let Some(response) = unauthorized(&headers) {
        return response;
    }

    let request_id = {
        let mut submissions = state.submissions.lock().unwrap();
        let request_id = format!("req-{}", submissions.len() + 1);
        submissions.insert(request_id.clone(), (model_id.clone(), arguments.clone()));
        request_id
    };

    state.record(Call::Submit { model_id, arguments });

    let base = format!("http://{}/requests/{request_id}", state.addr);
    Json(json!({
        "request_id": request_id,
        "status_url": format!("{base}/status"),
        "response_url": base,
        "cancel_url": format!("{base}/cancel"),
    }))
    .into_response()
}

async fn handle_status(
    State(state): State<Arc<MockFalState>>,
    Path(request_id): Path<String>,
    Query(query): Query<StatusQuery>,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = unauthorized(&headers) {
        return response;
    }

    let logs = query.logs == 1;
    state.record(Call::Status {
        request_id: request_id.clone(),
        logs,
    });

    let poll = {
        let mut polls = state.polls.lock().unwrap();
        let count = polls.entry(request_id).or_insert(0);
        *count += 1;
        *count
    };

    let log_lines = logs.then(|| json!([{ "message": format!("poll {poll}"), "level": "INFO" }]));

    let body = match poll {
        1 => json!({ "status": "IN_QUEUE", "queue_position": 0 }),
        n if n < POLLS_UNTIL_COMPLETE => json!({ "status": "IN_PROGRESS", "logs": log_lines }),
        _ => json!({ "status": "COMPLETED", "logs": log_lines, "metrics": { "inference_time": 0.5 } }),
    };

    (StatusCode::ACCEPTED, Json(body)).into_response()
}

async fn handle_result(
    State(state): State<Arc<MockFalState>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = unauthorized(&headers) {
        return response;
    }

    state.record(Call::Result {
        request_id: request_id.clone(),
    });

    let submission = state.submissions.lock().unwrap().get(&request_id).cloned();

    match submission {
        Some((model_id, arguments)) => Json(result_for(&model_id, &arguments)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Request not found" }))).into_response(),
    }
}
