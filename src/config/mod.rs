mod env;
mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use env::apply_env;
pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub downstream: DownstreamConfig,
}

/// Relay listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Downstream inference service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownstreamConfig {
    /// Base URL shared by both forwarded calls (e.g., "http://127.0.0.1:5001")
    #[serde(default = "default_downstream_url")]
    pub url: String,
    /// Request timeout in seconds; the HTTP client default applies when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_downstream_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: default_downstream_url(),
            timeout_seconds: None,
        }
    }
}

impl DownstreamConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Full URL for a downstream sub-path such as "/predict"
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Returns true if the URL uses HTTPS
    pub fn is_tls(&self) -> bool {
        self.url.to_lowercase().starts_with("https://")
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load configuration from an explicit path, a default location, or built-in defaults
    ///
    /// An explicit path must exist. Without one, the default locations are
    /// tried in order and the built-in defaults are used when none exists.
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["config.yaml", "config.yml", "./config/config.yaml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                Ok(Self::default())
            }
        }
    }

    /// Resolve the effective configuration: file (or defaults), then process environment
    pub fn resolve(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load_or_default(config_path)?;
        apply_env(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `run` command-line overrides, which beat both file and environment
    ///
    /// The downstream URL is validated again when it is overridden.
    pub fn apply_overrides(
        &mut self,
        port: Option<u16>,
        downstream_url: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(url) = downstream_url {
            self.downstream.url = url;
            self.validate()?;
        }
        Ok(())
    }

    /// Check that the downstream URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.downstream.url).map_err(|e| {
            ConfigError::Validation(format!(
                "invalid downstream url '{}': {}",
                self.downstream.url, e
            ))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "unsupported downstream url scheme '{}' (expected http or https)",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
