//! MCP server for creating Anki cards via AnkiConnect.
//!
//! Exposes four tools (add a card, list decks, list note types, summarize the
//! collection) to LLM assistants. Each call is forwarded to AnkiConnect and
//! answered with a JSON success/failure envelope.

mod server;

use std::sync::Arc;
use std::time::Duration;

use ankicard::{DEFAULT_URL, Gateway, GatewayConfig};
use clap::Parser;
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::server::CardServer;

// ============================================================================
// CLI Arguments
// ============================================================================

/// MCP server for creating Anki cards via AnkiConnect.
#[derive(Parser, Debug)]
#[command(name = "ankicard-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// AnkiConnect URL
    #[arg(long, env = "ANKICONNECT_URL", default_value = DEFAULT_URL)]
    anki_url: String,

    /// AnkiConnect API key, if AnkiConnect is configured to require one
    #[arg(long, env = "ANKICONNECT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Seconds to wait for each AnkiConnect request
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Transport mode
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value_t = 3000)]
    http_port: u16,

    /// HTTP server bind address (only used with --transport http)
    #[arg(long, default_value = "127.0.0.1")]
    http_host: String,
}

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum Transport {
    /// Standard I/O transport (default, for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP transport (for remote connections)
    Http,
}

impl Args {
    fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            anki_url: self.anki_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..Default::default()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v when set.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.gateway_config();
    info!(
        anki_url = %config.anki_url,
        timeout = ?config.timeout,
        transport = ?args.transport,
        "Starting ankicard-mcp server"
    );

    let server = CardServer::new(Gateway::new(&config));

    match args.transport {
        Transport::Stdio => {
            let transport = (tokio::io::stdin(), tokio::io::stdout());
            let mcp_server = server.serve(transport).await?;
            mcp_server.waiting().await?;
        }
        Transport::Http => {
            use rmcp::transport::streamable_http_server::{
                StreamableHttpServerConfig, StreamableHttpService,
                session::local::LocalSessionManager,
            };

            let bind_addr = format!("{}:{}", args.http_host, args.http_port);
            info!(bind_addr = %bind_addr, "Starting HTTP transport");

            let service: StreamableHttpService<CardServer, LocalSessionManager> =
                StreamableHttpService::new(
                    move || Ok(server.clone()),
                    Arc::new(LocalSessionManager::default()),
                    StreamableHttpServerConfig::default(),
                );

            let router = axum::Router::new().nest_service("/mcp", service);
            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            info!(bind_addr = %bind_addr, "MCP server listening on HTTP");

            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ankicard-mcp"]).unwrap();
        assert_eq!(args.transport, Transport::Stdio);
        assert_eq!(args.timeout_secs, 10);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_gateway_config_from_flags() {
        let args = Args::try_parse_from([
            "ankicard-mcp",
            "--anki-url",
            "http://localhost:9999",
            "--timeout-secs",
            "3",
            "--transport",
            "http",
            "-vv",
        ])
        .unwrap();
        let config = args.gateway_config();
        assert_eq!(config.anki_url, "http://localhost:9999");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.defaults.deck, "English");
        assert_eq!(args.transport, Transport::Http);
        assert_eq!(args.verbose, 2);
    }
}
