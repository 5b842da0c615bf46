//! Ring MCP Server - Entry Point
//!
//! Provides both stdio (for Claude Desktop) and HTTP transports.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ring_mcp::auth::TokenManager;
use ring_mcp::config::{Config, ServerOptions, TransportKind};
use ring_mcp::error::AuthError;
use ring_mcp::server::RingMcpServer;

#[derive(Parser, Debug)]
#[command(name = "ring-mcp")]
#[command(about = "MCP server for Ring home security")]
#[command(version)]
struct Cli {
    /// Use HTTP+SSE transport instead of stdio
    #[arg(long)]
    http: bool,

    /// Port for the HTTP transport
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Host for the HTTP transport
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Ring refresh token (alternative: RING_REFRESH_TOKEN env var)
    #[arg(long)]
    token: Option<String>,

    /// Path of the persisted token file
    #[arg(long, default_value = "ring-config.json")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // stdout carries the protocol in stdio mode; logs always go to stderr.
    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = ServerOptions {
        transport: if cli.http { TransportKind::Http } else { TransportKind::Stdio },
        port: cli.port,
        host: cli.host,
    };

    let config = Config::new(cli.token, Some(cli.config));
    let env_token = std::env::var("RING_REFRESH_TOKEN").ok();
    let token_manager = TokenManager::new(&config, env_token);
    let server = Arc::new(RingMcpServer::new(config, token_manager));

    match options.transport {
        TransportKind::Stdio => server.run_stdio().await,
        TransportKind::Http => server.run_http(&options).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        http = cli.http,
        "Starting Ring MCP server"
    );

    if let Err(error) = run(cli).await {
        // Single process-lifecycle boundary: everything below stays pure.
        if let Some(AuthError::NoToken) = error.downcast_ref::<AuthError>() {
            eprintln!("{error}");
            std::process::exit(1);
        }

        tracing::error!(error = %format!("{error:#}"), "Failed to start server");
        std::process::exit(1);
    }
}
