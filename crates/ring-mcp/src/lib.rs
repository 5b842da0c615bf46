//! Ring MCP Server
//!
//! A Model Context Protocol (MCP) server for the Ring home-security cloud.
//! Enables LLM agents to list devices, arm and disarm alarms, capture
//! camera snapshots, switch lights, and monitor real-time events.
//!
//! # Features
//!
//! - **6 MCP Tools**: devices, alarm, camera snapshot, lights, event monitor
//! - **Async-first**: Built on Tokio, stdio and HTTP/SSE transports
//! - **Credential lifecycle**: token precedence, validation with backoff,
//!   and persistence of rotated refresh tokens
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ring_mcp::{auth::TokenManager, config::Config, server::RingMcpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let token_manager = TokenManager::new(&config, std::env::var("RING_REFRESH_TOKEN").ok());
//!     let server = Arc::new(RingMcpServer::new(config, token_manager));
//!
//!     server.run_stdio().await
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use client::RingClient;
pub use config::Config;
pub use error::{AuthError, ClientError, ToolError};
