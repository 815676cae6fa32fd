//! Environment overrides for the loaded configuration

use super::{AppConfig, ConfigError};

pub const PORT_VAR: &str = "PORT";
pub const HOST_VAR: &str = "HOST";
pub const DOWNSTREAM_URL_VAR: &str = "DOWNSTREAM_BASE_URL";
pub const DOWNSTREAM_TIMEOUT_VAR: &str = "DOWNSTREAM_TIMEOUT_SECONDS";

/// Apply environment overrides on top of `config`
///
/// `lookup` resolves a variable name to its value; the binary passes
/// `std::env::var`, tests pass a map. Empty values are ignored.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get(PORT_VAR) {
        config.server.port = port.trim().parse().map_err(|_| {
            ConfigError::Validation(format!("{} must be a port number, got '{}'", PORT_VAR, port))
        })?;
    }

    if let Some(host) = get(HOST_VAR) {
        config.server.host = host;
    }

    if let Some(url) = get(DOWNSTREAM_URL_VAR) {
        config.downstream.url = url;
    }

    if let Some(timeout) = get(DOWNSTREAM_TIMEOUT_VAR) {
        let seconds = timeout.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "{} must be a whole number of seconds, got '{}'",
                DOWNSTREAM_TIMEOUT_VAR, timeout
            ))
        })?;
        config.downstream.timeout_seconds = Some(seconds);
    }

    Ok(())
}
