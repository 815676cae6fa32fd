//! Mock inference service that simulates the downstream `/predict` and `/chat` API
//!
//! Tests pre-configure responses via SharedBackendState before each request.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::types::{BackendState, MockResponse, ReceivedRequest, SharedBackendState};

/// Default /predict response when no response is queued
fn default_predict_response() -> MockResponse {
    MockResponse::json(
        r#"{"predicted_disease":"Common Cold","specialist":"General Physician","advice":"Rest and drink fluids. For a proper diagnosis, please consult a healthcare professional.","priority":"Routine"}"#,
    )
}

/// Default /chat response when no response is queued
fn default_chat_response() -> MockResponse {
    MockResponse::json(r#"{"response":"Default response (no mock queued)"}"#)
}

/// Handle POST /predict and /chat - serves pre-configured mock responses
async fn handle_inference(State(state): State<SharedBackendState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();

    let body_bytes = axum::body::to_bytes(request.into_body(), 10 * 1024 * 1024)
        .await
        .unwrap_or_default();
    let raw_body = String::from_utf8_lossy(&body_bytes).into_owned();
    let body_json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    let received = ReceivedRequest {
        path: path.clone(),
        raw_body,
        body: body_json,
    };

    // Pop the next configured response (or use default)
    let mock_response = {
        let mut state = state.lock().unwrap();
        state.received_requests.push(received);
        state
            .response_queues
            .get_mut(&path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| match path.as_str() {
                "/predict" => default_predict_response(),
                _ => default_chat_response(),
            })
    };

    Response::builder()
        .status(mock_response.status)
        .header("Content-Type", &mock_response.content_type)
        .body(Body::from(mock_response.body))
        .unwrap()
        .into_response()
}

/// Start the mock inference service and return the shared state handle
pub async fn start(port: u16) -> anyhow::Result<SharedBackendState> {
    let state: SharedBackendState = std::sync::Arc::new(std::sync::Mutex::new(BackendState::default()));

    let app = Router::new()
        .route("/predict", post(handle_inference))
        .route("/chat", post(handle_inference))
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await
        .map_err(|e| anyhow::anyhow!("Failed to bind mock inference service to {}: {}", addr, e))?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock inference service failed");
    });

    // Brief pause to let the server start accepting connections
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    Ok(state)
}

/// Helper to configure the next response for a downstream path
pub fn queue_response(state: &SharedBackendState, path: &str, response: MockResponse) {
    state
        .lock()
        .unwrap()
        .response_queues
        .entry(path.to_string())
        .or_default()
        .push_back(response);
}

/// Helper to get all requests received since last clear
pub fn drain_requests(state: &SharedBackendState) -> Vec<ReceivedRequest> {
    let mut s = state.lock().unwrap();
    s.received_requests.drain(..).collect()
}
