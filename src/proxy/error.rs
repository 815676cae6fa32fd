//! Relay failure type and its client-facing rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure while forwarding a request downstream
///
/// The display text is the client-facing message. The underlying cause is
/// only reachable through `source()` and is never written to the response.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Connection failure, timeout, unreadable body or non-2xx status
    #[error("{service} is not responding.")]
    Unavailable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl RelayError {
    pub fn unavailable(service: &'static str, source: reqwest::Error) -> Self {
        Self::Unavailable { service, source }
    }

    /// Underlying cause, for operator logs
    pub fn detail(&self) -> &reqwest::Error {
        match self {
            Self::Unavailable { source, .. } => source,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
