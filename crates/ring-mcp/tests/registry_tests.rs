//! Tool registry dispatch semantics.
//!
//! Business-logic failures must surface as successful envelopes whose text
//! is prefixed "Error: "; only an unknown tool name is a protocol-level
//! fault.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use ring_mcp::client::RingClient;
use ring_mcp::config::Config;
use ring_mcp::error::{ToolError, ToolResult};
use ring_mcp::models::ToolResponse;
use ring_mcp::tools::{McpTool, ToolContext, ToolRegistry};

/// A tool that always succeeds with a fixed message.
struct EchoTool;

#[async_trait::async_trait]
impl McpTool for EchoTool {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Echo a fixed message"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(
        &self,
        _ctx: &ToolContext,
        _input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        Ok(ToolResponse::text("echoed"))
    }
}

/// A tool that always fails with a validation error.
struct FailingTool;

#[async_trait::async_trait]
impl McpTool for FailingTool {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn description(&self) -> &'static str {
        "Always fails"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(
        &self,
        _ctx: &ToolContext,
        _input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        Err(ToolError::validation("deviceId", "Device ID is required"))
    }
}

/// A second registration under the "echo" name.
struct ReplacementEchoTool;

#[async_trait::async_trait]
impl McpTool for ReplacementEchoTool {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Replacement echo"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(
        &self,
        _ctx: &ToolContext,
        _input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        Ok(ToolResponse::text("replaced"))
    }
}

fn test_registry() -> ToolRegistry {
    // The fake tools never touch the client.
    let config = Config::for_testing("http://127.0.0.1:1");
    let client = RingClient::new(&config, "unused".to_string()).unwrap();
    let ctx = ToolContext::new(Arc::new(client), Duration::from_secs(1));

    let mut registry = ToolRegistry::new(ctx);
    registry.register_multiple(vec![Box::new(EchoTool), Box::new(FailingTool)]);
    registry
}

#[tokio::test]
async fn test_unknown_tool_propagates_as_error() {
    let registry = test_registry();

    let result = registry.execute("unknown_tool", json!({})).await;
    match result {
        Err(ToolError::UnknownTool(name)) => assert_eq!(name, "unknown_tool"),
        other => panic!("expected UnknownTool, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tool_failure_becomes_error_envelope() {
    let registry = test_registry();

    let response = registry.execute("failing", json!({})).await.unwrap();
    let text = response.first_text().unwrap();

    assert!(text.starts_with("Error: "), "got: {text}");
    assert!(text.contains("Device ID is required"));
}

#[tokio::test]
async fn test_successful_tool_passes_through() {
    let registry = test_registry();

    let response = registry.execute("echo", json!({})).await.unwrap();
    assert_eq!(response.first_text(), Some("echoed"));
}

#[tokio::test]
async fn test_definitions_preserve_insertion_order() {
    let registry = test_registry();

    let names: Vec<_> =
        registry.tool_definitions().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["echo", "failing"]);
    assert_eq!(registry.tool_names(), vec!["echo", "failing"]);
}

#[tokio::test]
async fn test_duplicate_registration_overwrites_in_place() {
    let mut registry = test_registry();
    registry.register(Box::new(ReplacementEchoTool));

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.tool_names(), vec!["echo", "failing"]);

    let response = registry.execute("echo", json!({})).await.unwrap();
    assert_eq!(response.first_text(), Some("replaced"));
}

#[tokio::test]
async fn test_introspection_and_clear() {
    let mut registry = test_registry();

    assert!(registry.has_tool("echo"));
    assert!(!registry.has_tool("nope"));
    assert!(!registry.is_empty());

    registry.clear();
    assert!(registry.is_empty());
    assert!(!registry.has_tool("echo"));
}
