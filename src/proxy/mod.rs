//! HTTP relay server

mod error;
mod handler;
pub mod server;

pub use error::RelayError;
pub use handler::{Endpoint, ProxyHandler};
pub use server::{build_router, run_server, ProxyState, API_PREFIX};
