//! HTTP transport.
//!
//! Exposes `GET /health`, `POST /mcp` (JSON-RPC), and `GET /mcp` (SSE).
//! Tool-call results are also pushed to the SSE channel so a connected
//! event stream observes them. CORS is scoped to a single fixed origin.

use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ALLOWED_ORIGIN;

use super::RingMcpServer;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// JSON-RPC version constant.
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: Some(result),
            error: None,
            id,
        }
    }

    #[must_use]
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }
}

/// Shared state for HTTP handlers.
pub struct HttpState {
    server: Arc<RingMcpServer>,
    events: broadcast::Sender<String>,
}

/// Create the HTTP router for MCP.
pub fn create_router(server: Arc<RingMcpServer>) -> Router {
    let (events, _) = broadcast::channel(64);
    let state = Arc::new(HttpState { server, events });

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static(ALLOWED_ORIGIN))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health_check))
        .route("/mcp", axum::routing::post(handle_mcp_post).get(handle_mcp_get))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "transport": "http"
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Handle POST requests to /mcp.
async fn handle_mcp_post(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<JsonRpcRequest>,
) -> Response {
    tracing::debug!(method = %req.method, "Handling MCP POST request");

    // A request without an id is a notification and must not get a reply,
    // whatever the method is named.
    if req.id.is_none() {
        return StatusCode::ACCEPTED.into_response();
    }

    let response = super::dispatch(&state.server, &req).await;

    // Mirror tool results onto the SSE stream for connected clients.
    if req.method == "tools/call" {
        if let Some(result) = &response.result {
            let event = JsonRpcResponse::success(response.id.clone(), result.clone());
            if let Ok(data) = serde_json::to_string(&event) {
                let _ = state.events.send(data);
            }
        }
    }

    Json(response).into_response()
}

/// Handle GET requests to /mcp: an SSE stream of server-pushed messages.
async fn handle_mcp_get(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    tracing::info!("New SSE stream connection");

    let stream = event_stream(state.events.subscribe());

    (
        [
            ("X-Accel-Buffering", "no"),
            ("Cache-Control", "no-cache, no-store, must-revalidate"),
        ],
        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        ),
    )
}

fn event_stream(
    receiver: broadcast::Receiver<String>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(data) => Some(Ok(Event::default().event("message").data(data))),
            Err(error) => {
                tracing::debug!(%error, "Broadcast lag, client will catch up");
                None
            }
        }
    })
}
