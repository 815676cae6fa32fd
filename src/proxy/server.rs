//! Relay server: shared state, router and listener

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handler::{analyze_symptoms, handle_chat, Endpoint};
use crate::config::{AppConfig, ServerConfig};

/// Prefix the relayed endpoints are mounted under
pub const API_PREFIX: &str = "/api/symptoms";

/// Shared state for the relay
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
}

impl ProxyState {
    /// Build state with an HTTP client configured from `config`
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http_client = build_http_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }
}

/// Build the HTTP client used for downstream calls
///
/// No timeout is set unless configured, so the client's own default applies.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut client_builder = reqwest::Client::builder().pool_max_idle_per_host(10);

    if let Some(seconds) = config.downstream.timeout_seconds {
        client_builder = client_builder.timeout(Duration::from_secs(seconds));
    }

    client_builder.build()
}

/// Build the router: the relayed endpoints plus a local health check
pub fn build_router(state: ProxyState) -> Router {
    let symptoms = Router::new()
        .route(Endpoint::Analyze.route(), post(analyze_symptoms))
        .route(Endpoint::Chat.route(), post(handle_chat));

    Router::new()
        .route("/health", get(health_handler))
        .nest(API_PREFIX, symptoms)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Bind the listen socket; `host` may be an IP literal or a resolvable hostname
pub async fn bind_listener(config: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port)).await
}

/// Run the relay server until it fails
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = bind_listener(&config.server).await?;
    let downstream = config.downstream.base_url().to_string();

    let state = ProxyState::new(config)?;
    let app = build_router(state);

    tracing::info!("symptom-relay listening on {}", listener.local_addr()?);
    tracing::info!("Relaying to {}", downstream);

    Ok(axum::serve(listener, app).await?)
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}
