//! symptom-relay: HTTP relay in front of a symptom analysis inference service
//!
//! Forwards symptom analysis and chat requests to the downstream service and
//! relays its answers, collapsing any downstream failure into a generic error.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

use symptom_relay::{config::AppConfig, proxy::Endpoint, run_server};

#[derive(Parser)]
#[command(name = "symptom-relay")]
#[command(version = "0.1.0")]
#[command(about = "HTTP relay for a symptom analysis inference service")]
#[command(long_about = "
symptom-relay accepts symptom analysis and chat requests and forwards them
unmodified to a separately hosted inference service:
  POST /api/symptoms/analyze -> <downstream>/predict
  POST /api/symptoms/chat    -> <downstream>/chat

Configuration comes from an optional YAML file, then the environment
(PORT, HOST, DOWNSTREAM_BASE_URL, DOWNSTREAM_TIMEOUT_SECONDS, also read
from .env), then command line overrides.

Example usage:
  symptom-relay run
  symptom-relay run --port 8080 --downstream-url http://127.0.0.1:5001
  symptom-relay check-config --config config.yaml
")]
struct Cli {
    /// Path to config file (optional; defaults are used when absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override downstream base URL (e.g., "http://127.0.0.1:5001")
        #[arg(long)]
        downstream_url: Option<String>,
    },

    /// Validate and print the effective configuration
    CheckConfig,

    /// Test connection to the downstream inference service
    TestDownstream,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    match cli.command {
        Commands::Run {
            port,
            downstream_url,
        } => {
            run_relay(cli.config.as_deref(), port, downstream_url).await?;
        }
        Commands::CheckConfig => {
            check_config(cli.config.as_deref());
        }
        Commands::TestDownstream => {
            test_downstream(cli.config.as_deref()).await?;
        }
    }

    Ok(())
}

/// Run the relay server
async fn run_relay(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    downstream_url_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_or_exit(config_path);
    config.apply_overrides(port_override, downstream_url_override)?;

    if let Some(path) = config_path {
        tracing::info!("Loaded configuration from {:?}", path);
    }

    run_server(config).await?;

    Ok(())
}

/// Validate configuration
fn check_config(config_path: Option<&Path>) {
    match AppConfig::resolve(config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid\n");
            println!("Server:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("\nDownstream:");
            println!("  URL: {}", config.downstream.base_url());
            println!("  TLS: {}", if config.downstream.is_tls() { "enabled" } else { "disabled" });
            match config.downstream.timeout_seconds {
                Some(seconds) => println!("  Timeout: {}s", seconds),
                None => println!("  Timeout: client default"),
            }
            println!("\nRoutes:");
            for endpoint in [Endpoint::Analyze, Endpoint::Chat] {
                println!(
                    "  POST {}{} -> {}",
                    symptom_relay::proxy::API_PREFIX,
                    endpoint.route(),
                    config.downstream.endpoint_url(endpoint.downstream_path())
                );
            }
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Test connection to the downstream service
async fn test_downstream(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_exit(config_path);
    let base_url = config.downstream.base_url();

    println!("Testing connection to downstream: {}", base_url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    // Any HTTP answer proves the service is listening; only transport errors fail
    match client.get(base_url).send().await {
        Ok(resp) => {
            println!("✓ Downstream is reachable");
            println!("  Status: {}", resp.status());
        }
        Err(e) => {
            println!("✗ Failed to connect to downstream: {}", e);
            std::process::exit(1);
        }
    }

    for endpoint in [Endpoint::Analyze, Endpoint::Chat] {
        println!(
            "  {} -> {}",
            endpoint.service_name(),
            config.downstream.endpoint_url(endpoint.downstream_path())
        );
    }

    Ok(())
}

/// Resolve configuration or exit with error
fn load_config_or_exit(config_path: Option<&Path>) -> AppConfig {
    match AppConfig::resolve(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            eprintln!("\nCheck the config file (if any) and the PORT, HOST,");
            eprintln!("DOWNSTREAM_BASE_URL and DOWNSTREAM_TIMEOUT_SECONDS variables.");
            std::process::exit(1);
        }
    }
}
