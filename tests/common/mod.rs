//! Mock downstream inference service and relay helpers shared by the integration tests
#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use symptom_relay::{AppConfig, ProxyState};
use tower::ServiceExt;

/// A canned response for one downstream path
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "application/json",
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "text/plain",
        }
    }
}

/// A request received by the mock downstream
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Shared state for the mock downstream
///
/// Paths without a configured response echo `{"path": .., "received": ..}`.
#[derive(Debug, Default)]
pub struct DownstreamState {
    pub responses: HashMap<String, MockResponse>,
    pub received: Vec<ReceivedRequest>,
    pub delay: Option<Duration>,
}

pub type SharedDownstreamState = Arc<Mutex<DownstreamState>>;

async fn handle_downstream(
    State(state): State<SharedDownstreamState>,
    uri: Uri,
    request: Request<Body>,
) -> Response {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let path = uri.path().to_string();

    let (configured, delay) = {
        let mut state = state.lock().unwrap();
        state.received.push(ReceivedRequest {
            path: path.clone(),
            content_type,
            body: body.clone(),
        });
        (state.responses.get(&path).cloned(), state.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match configured {
        Some(mock) => Response::builder()
            .status(mock.status)
            .header(header::CONTENT_TYPE, mock.content_type)
            .body(Body::from(mock.body))
            .unwrap(),
        None => {
            let received: serde_json::Value =
                serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
            (
                StatusCode::OK,
                axum::Json(json!({ "path": path, "received": received })),
            )
                .into_response()
        }
    }
}

/// Start a mock downstream on an ephemeral port; returns its base URL and state
pub async fn spawn_downstream() -> (String, SharedDownstreamState) {
    let state: SharedDownstreamState = Arc::new(Mutex::new(DownstreamState::default()));

    let app = Router::new()
        .route("/predict", post(handle_downstream))
        .route("/chat", post(handle_downstream))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock downstream failed");
    });

    (format!("http://{}", addr), state)
}

/// A base URL nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn respond_with(state: &SharedDownstreamState, path: &str, response: MockResponse) {
    state
        .lock()
        .unwrap()
        .responses
        .insert(path.to_string(), response);
}

pub fn received(state: &SharedDownstreamState) -> Vec<ReceivedRequest> {
    state.lock().unwrap().received.clone()
}

/// Build the relay router pointed at `downstream_url`
pub fn relay_app(downstream_url: &str) -> Router {
    let mut config = AppConfig::default();
    config.downstream.url = downstream_url.to_string();
    relay_app_with(config)
}

pub fn relay_app_with(config: AppConfig) -> Router {
    symptom_relay::build_router(ProxyState::new(config).expect("Failed to build relay state"))
}

/// POST `body` with a JSON content type and collect the response
pub async fn post_json(app: &Router, path: &str, body: &str) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

pub fn as_json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!("Response is not JSON: {}: {}", e, String::from_utf8_lossy(body))
    })
}
