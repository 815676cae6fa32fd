//! symptom-relay: HTTP relay for a symptom analysis and chat inference service
//!
//! Accepts JSON requests on `/api/symptoms/analyze` and `/api/symptoms/chat`,
//! forwards them unmodified to the downstream `/predict` and `/chat`
//! endpoints, and relays the downstream body or a generic failure.

pub mod config;
pub mod proxy;

pub use config::AppConfig;
pub use proxy::{build_router, run_server, ProxyState};
