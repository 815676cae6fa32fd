//! HTTP client that simulates how the web frontend talks to the relay

use reqwest::Client;

use crate::types::ProxyResponse;

/// Build an HTTP client
pub fn build_client() -> Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build reqwest client")
}

/// POST a raw JSON body to a relay path (e.g. "/api/symptoms/analyze")
pub async fn send_raw(
    client: &Client,
    proxy_addr: &str,
    path: &str,
    raw_body: &str,
) -> anyhow::Result<ProxyResponse> {
    let url = format!("http://{proxy_addr}{path}");

    let resp = client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(raw_body.to_string())
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send request to relay: {}", e))?;

    let status = resp.status().as_u16();
    let raw_body = resp
        .text()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read relay response: {}", e))?;

    let body: serde_json::Value = serde_json::from_str(&raw_body).map_err(|e| {
        anyhow::anyhow!(
            "Relay response is not valid JSON: {}: {}",
            e,
            preview(&raw_body)
        )
    })?;

    Ok(ProxyResponse { status, raw_body, body })
}

/// POST a JSON value to a relay path
pub async fn send_json(
    client: &Client,
    proxy_addr: &str,
    path: &str,
    request_body: &serde_json::Value,
) -> anyhow::Result<ProxyResponse> {
    send_raw(client, proxy_addr, path, &request_body.to_string()).await
}

/// First 500 characters of a body, for error messages
fn preview(raw_body: &str) -> String {
    raw_body.chars().take(500).collect()
}
