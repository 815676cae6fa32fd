//! Request/response handling for the relayed endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;
use std::time::Instant;

use super::error::RelayError;
use super::server::ProxyState;

/// Body forwarded when the client sent nothing or a non-JSON content type
const EMPTY_OBJECT: &[u8] = b"{}";

/// Content type of every successful relay response
const JSON_UTF8: &str = "application/json; charset=utf-8";

/// A relayed endpoint and its fixed downstream counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Symptom analysis, served downstream by `/predict`
    Analyze,
    /// Free-form health chat, served downstream by `/chat`
    Chat,
}

impl Endpoint {
    /// Route under the `/api/symptoms` prefix
    pub fn route(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "/analyze",
            Endpoint::Chat => "/chat",
        }
    }

    /// Sub-path appended to the downstream base URL
    pub fn downstream_path(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "/predict",
            Endpoint::Chat => "/chat",
        }
    }

    /// Name used in the client-facing failure message
    pub fn service_name(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "AI service",
            Endpoint::Chat => "Chatbot service",
        }
    }
}

/// Proxy request handler
pub struct ProxyHandler {
    state: ProxyState,
}

impl ProxyHandler {
    pub fn new(state: ProxyState) -> Self {
        Self { state }
    }

    /// Check if Content-Type is `application/json`, ignoring parameters
    ///
    /// Vendor `+json` types are not JSON here; their bodies forward as `{}`.
    fn is_json_content_type(content_type: &str) -> bool {
        content_type
            .split(';')
            .next()
            .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false)
    }

    /// Validate the inbound body and return the exact bytes to forward
    ///
    /// A missing body or a non-JSON content type forwards `{}`. A JSON
    /// content type with a malformed body is rejected with 400.
    fn inbound_body(headers: &HeaderMap, body: Bytes) -> Result<Bytes, Response> {
        let is_json = headers
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(Self::is_json_content_type)
            .unwrap_or(false);

        if !is_json || body.is_empty() {
            return Ok(Bytes::from_static(EMPTY_OBJECT));
        }

        match serde_json::from_slice::<IgnoredAny>(&body) {
            Ok(_) => Ok(body),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected malformed JSON request body");
                Err((
                    StatusCode::BAD_REQUEST,
                    format!("Failed to parse request body: {}", e),
                )
                    .into_response())
            }
        }
    }

    /// Turn a successful downstream body into the client response
    ///
    /// JSON bodies are passed through byte for byte. Anything else is sent
    /// back as a JSON string holding the raw text.
    fn relay_body(body: Bytes) -> Response {
        let body = if serde_json::from_slice::<IgnoredAny>(&body).is_ok() {
            body
        } else {
            let text = String::from_utf8_lossy(&body).into_owned();
            Bytes::from(serde_json::Value::String(text).to_string())
        };

        (StatusCode::OK, [(header::CONTENT_TYPE, JSON_UTF8)], body).into_response()
    }

    /// Forward `body` to the endpoint's downstream path and return the downstream body
    ///
    /// Any downstream 2xx counts as success. Transport failures and non-2xx
    /// statuses both collapse into [`RelayError::Unavailable`].
    pub async fn forward(&self, endpoint: Endpoint, body: Bytes) -> Result<Bytes, RelayError> {
        let url = self.state.config.downstream.endpoint_url(endpoint.downstream_path());
        let fail = |e: reqwest::Error| RelayError::unavailable(endpoint.service_name(), e);

        tracing::debug!(
            endpoint = ?endpoint,
            downstream_url = %url,
            body_size = body.len(),
            "Forwarding request downstream"
        );

        let response = self
            .state
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(fail)?
            .error_for_status()
            .map_err(fail)?;

        tracing::debug!(status = %response.status(), "Received response from downstream");

        response.bytes().await.map_err(fail)
    }

    /// Handle one inbound request end to end
    pub async fn handle(&self, endpoint: Endpoint, headers: HeaderMap, body: Bytes) -> Response {
        let start = Instant::now();

        let body = match Self::inbound_body(&headers, body) {
            Ok(body) => body,
            Err(rejection) => return rejection,
        };

        match self.forward(endpoint, body).await {
            Ok(downstream_body) => {
                tracing::debug!(
                    endpoint = ?endpoint,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Relayed downstream response"
                );
                Self::relay_body(downstream_body)
            }
            Err(e) => {
                tracing::error!(
                    error = %e.detail(),
                    downstream_path = endpoint.downstream_path(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Error proxying to downstream"
                );
                e.into_response()
            }
        }
    }
}

/// POST /api/symptoms/analyze
pub async fn analyze_symptoms(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    ProxyHandler::new(state).handle(Endpoint::Analyze, headers, body).await
}

/// POST /api/symptoms/chat
pub async fn handle_chat(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    ProxyHandler::new(state).handle(Endpoint::Chat, headers, body).await
}
