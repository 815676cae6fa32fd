//! Common test helpers and JSON builders

use serde_json::{json, Value};

pub const ANALYZE_PATH: &str = "/api/symptoms/analyze";
pub const CHAT_PATH: &str = "/api/symptoms/chat";

// ─── Request builders ────────────────────────────────────────────────────────

/// Build a symptom analysis request as the web frontend sends it
pub fn analyze_request(symptoms: &[&str], age_group: &str, language: &str) -> Value {
    let symptoms: serde_json::Map<String, Value> = symptoms
        .iter()
        .map(|s| (s.to_string(), json!(1)))
        .collect();
    json!({
        "symptoms": symptoms,
        "ageGroup": age_group,
        "language": language
    })
}

/// Build a chat request
pub fn chat_request(query: &str, language: &str) -> Value {
    json!({
        "query": query,
        "language": language
    })
}

// ─── Response builders ────────────────────────────────────────────────────────

/// Build a prediction response from the inference service
pub fn predict_response(disease: &str, specialist: &str, priority: &str) -> String {
    json!({
        "predicted_disease": disease,
        "specialist": specialist,
        "advice": "Rest and monitor your symptoms. For a proper diagnosis, please consult a healthcare professional.",
        "priority": priority
    })
    .to_string()
}

/// Build a chat response from the inference service
pub fn chat_response(text: &str) -> String {
    json!({ "response": text }).to_string()
}

// ─── Assertion helpers ────────────────────────────────────────────────────────

/// Assert two strings are equal, with context on failure
pub fn assert_eq_str(actual: &str, expected: &str, label: &str) -> anyhow::Result<()> {
    if actual != expected {
        Err(anyhow::anyhow!("{label}: expected {:?} but got {:?}", expected, actual))
    } else {
        Ok(())
    }
}

/// Assert condition is true, with message
pub fn assert_true(cond: bool, msg: &str) -> anyhow::Result<()> {
    if !cond {
        Err(anyhow::anyhow!("{}", msg))
    } else {
        Ok(())
    }
}

/// Assert the relay answered with the generic failure for `service`
pub fn assert_generic_failure(
    resp: &crate::types::ProxyResponse,
    service: &str,
) -> anyhow::Result<()> {
    assert_true(resp.status == 500, &format!("Expected 500, got {}", resp.status))?;
    assert_true(
        resp.body == json!({ "error": format!("{service} is not responding.") }),
        &format!("Unexpected failure body: {}", resp.raw_body),
    )
}
