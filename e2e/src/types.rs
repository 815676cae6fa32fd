//! Shared types for the e2e test framework

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A mock response the inference service will serve for the next request on a path
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl MockResponse {
    /// Create a standard JSON response
    pub fn json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    /// Create a JSON response with an explicit status
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "application/json".to_string(),
        }
    }

    /// Create an error response
    pub fn error(status: u16, body: impl Into<String>) -> Self {
        Self::with_status(status, body)
    }
}

/// Shared state for the mock inference service
#[derive(Debug, Default)]
pub struct BackendState {
    /// Per-path queues - tests push responses, the service pops and serves them
    pub response_queues: HashMap<String, VecDeque<MockResponse>>,
    /// All requests received by the service (for inspection)
    pub received_requests: Vec<ReceivedRequest>,
}

/// A request received by the mock inference service
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    /// Body exactly as it arrived
    pub raw_body: String,
    pub body: serde_json::Value,
}

pub type SharedBackendState = Arc<Mutex<BackendState>>;

/// Result of a relayed request
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: u16,
    pub raw_body: String,
    pub body: serde_json::Value,
}

impl ProxyResponse {
    /// Get a nested field using dot notation (e.g. "received.symptoms.fever")
    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        let mut current = &self.body;
        for part in path.split('.') {
            current = if let Ok(idx) = part.parse::<usize>() {
                current.as_array()?.get(idx)?
            } else {
                current.as_object()?.get(part)?
            };
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }
}

/// Result of a single test case
#[derive(Debug)]
#[allow(dead_code)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
