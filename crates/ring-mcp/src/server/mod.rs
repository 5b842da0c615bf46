//! MCP server implementation.
//!
//! Provides both stdio (for Claude Desktop) and HTTP/SSE transports. The
//! Ring client and tool registry are initialized lazily on the first
//! tools/list or tools/call request; a single-slot async cell guarantees
//! concurrent first requests await the same in-flight initialization.

pub mod stdio;
pub mod transport;

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::TokenManager;
use crate::config::{Config, ServerOptions};
use crate::tools::{self, ToolRegistry};

use transport::{JsonRpcRequest, JsonRpcResponse};

/// MCP server for the Ring cloud.
pub struct RingMcpServer {
    config: Config,
    token_manager: TokenManager,
    registry: OnceCell<ToolRegistry>,
}

impl RingMcpServer {
    /// Create a server; no vendor connection is made until the first
    /// tool request arrives.
    #[must_use]
    pub fn new(config: Config, token_manager: TokenManager) -> Self {
        Self { config, token_manager, registry: OnceCell::new() }
    }

    /// The tool registry, initializing the Ring session on first use.
    ///
    /// # Errors
    ///
    /// Returns error when credential resolution or connection validation
    /// fails; the next request will retry initialization.
    pub async fn registry(&self) -> anyhow::Result<&ToolRegistry> {
        self.registry
            .get_or_try_init(|| async {
                let client = self.token_manager.initialize(&self.config).await?;
                let registry = tools::build_registry(
                    Arc::new(client),
                    self.config.enumeration_timeout,
                );

                tracing::info!(tools = registry.len(), "Ring API and tools initialized");
                Ok::<_, anyhow::Error>(registry)
            })
            .await
    }

    /// Whether the Ring session and registry have been initialized.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.registry.initialized()
    }

    /// Run the server in stdio mode (for Claude Desktop).
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self: Arc<Self>) -> anyhow::Result<()> {
        tracing::info!("Starting MCP server in stdio mode");

        tokio::select! {
            result = stdio::run_stdio(Arc::clone(&self)) => result,
            () = shutdown_signal() => Ok(()),
        }
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(self: Arc<Self>, options: &ServerOptions) -> anyhow::Result<()> {
        tracing::info!(
            host = %options.host,
            port = options.port,
            "Starting MCP server in HTTP mode"
        );

        let router = transport::create_router(Arc::clone(&self));
        let listener =
            tokio::net::TcpListener::bind((options.host.as_str(), options.port)).await?;

        tracing::info!(
            "Ring MCP server running on http://{}:{}/mcp",
            options.host,
            options.port
        );
        tracing::info!(
            "Health check available at http://{}:{}/health",
            options.host,
            options.port
        );

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for RingMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingMcpServer")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Handle one JSON-RPC request; shared by both transports.
pub(crate) async fn dispatch(server: &RingMcpServer, req: &JsonRpcRequest) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => handle_initialize(req.id.clone(), &req.params),
        "initialized" | "notifications/initialized" => {
            JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))
        }
        "ping" => JsonRpcResponse::success(req.id.clone(), serde_json::json!({})),
        "tools/list" => handle_tools_list(server, req.id.clone()).await,
        "tools/call" => handle_tools_call(server, req.id.clone(), &req.params).await,
        _ => JsonRpcResponse::error(
            req.id.clone(),
            -32601,
            format!("Method not found: {}", req.method),
        ),
    }
}

fn handle_initialize(id: Option<serde_json::Value>, params: &serde_json::Value) -> JsonRpcResponse {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(|v| v.as_str())
        .unwrap_or("2024-11-05");

    tracing::info!("MCP initialize: protocol version {}", protocol_version);

    JsonRpcResponse::success(
        id,
        serde_json::json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "ring-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

async fn handle_tools_list(server: &RingMcpServer, id: Option<serde_json::Value>) -> JsonRpcResponse {
    let registry = match server.registry().await {
        Ok(registry) => registry,
        Err(error) => {
            tracing::error!(%error, "Initialization failed");
            return JsonRpcResponse::error(id, -32000, format!("Initialization failed: {error:#}"));
        }
    };

    JsonRpcResponse::success(
        id,
        serde_json::json!({
            "tools": registry.tool_definitions()
        }),
    )
}

async fn handle_tools_call(
    server: &RingMcpServer,
    id: Option<serde_json::Value>,
    params: &serde_json::Value,
) -> JsonRpcResponse {
    let tool_name = match params.get("name").and_then(|v| v.as_str()) {
        Some(name) => name,
        None => {
            return JsonRpcResponse::error(id, -32602, "Missing 'name' parameter");
        }
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    let registry = match server.registry().await {
        Ok(registry) => registry,
        Err(error) => {
            tracing::error!(%error, "Initialization failed");
            return JsonRpcResponse::error(id, -32000, format!("Initialization failed: {error:#}"));
        }
    };

    match registry.execute(tool_name, arguments).await {
        Ok(response) => match serde_json::to_value(&response) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                JsonRpcResponse::error(id, -32603, format!("Response encoding failed: {error}"))
            }
        },
        Err(error) => {
            tracing::error!(tool = %tool_name, %error, "Tool dispatch failed");
            JsonRpcResponse::error(id, -32602, error.to_string())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
