//! MCP tool implementations.
//!
//! Each tool declares a name/description/schema triple and an `execute`
//! that validates its arguments, calls the Ring client, and wraps the
//! result into a protocol envelope.

mod alarm;
mod camera;
mod devices;
mod events;
mod lights;

pub use alarm::ArmDisarmAlarmTool;
pub use camera::GetCameraSnapshotTool;
pub use devices::{GetDeviceInfoTool, ListDevicesTool};
pub use events::MonitorEventsTool;
pub use lights::TurnLightOnOffTool;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::client::RingClient;
use crate::error::{ClientError, ClientResult, ToolError, ToolResult};
use crate::models::ToolResponse;

/// Tool execution context.
pub struct ToolContext {
    /// Ring API client.
    pub client: Arc<RingClient>,

    /// Per-call timeout for enumeration calls.
    pub enumeration_timeout: Duration,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<RingClient>, enumeration_timeout: Duration) -> Self {
        Self { client, enumeration_timeout }
    }
}

/// Race a client call against the enumeration timeout.
pub(crate) async fn with_timeout<T>(
    duration: Duration,
    call: impl Future<Output = ClientResult<T>>,
) -> ToolResult<T> {
    match tokio::time::timeout(duration, call).await {
        Ok(result) => result.map_err(ToolError::from),
        Err(_) => Err(ClientError::Timeout(duration).into()),
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "list_devices").
    fn name(&self) -> &'static str;

    /// Tool description for the LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> ToolResult<ToolResponse>;
}

/// Tool metadata for protocol discovery.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,

    /// Tool description.
    pub description: String,

    /// JSON Schema for input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Name-keyed, insertion-ordered collection of tools bound to one Ring
/// session.
pub struct ToolRegistry {
    ctx: ToolContext,
    tools: Vec<Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create an empty registry around an execution context.
    #[must_use]
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx, tools: Vec::new() }
    }

    /// Register a tool; a duplicate name replaces the earlier registration
    /// in place, keeping its position.
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Register several tools in order.
    pub fn register_multiple(&mut self, tools: Vec<Box<dyn McpTool>>) {
        for tool in tools {
            self.register(tool);
        }
    }

    /// Enumerate definitions for protocol discovery, in insertion order.
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Dispatch a call to the named tool.
    ///
    /// A tool's own failure is reported as a *successful* envelope whose
    /// text is `"Error: <message>"`, so the calling agent can react without
    /// a protocol-level fault.
    ///
    /// # Errors
    ///
    /// Only an unknown name is a caller-level contract violation and
    /// propagates as [`ToolError::UnknownTool`].
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tracing::info!(tool = %name, "Executing tool");

        match tool.execute(&self.ctx, args).await {
            Ok(response) => Ok(response),
            Err(error) => {
                tracing::warn!(tool = %name, %error, "Tool reported an error");
                Ok(ToolResponse::text(format!("Error: {}", error.to_user_message())))
            }
        }
    }

    /// Whether a tool is registered under the name.
    #[must_use]
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Registered tool names, in insertion order.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Remove all registrations.
    pub fn clear(&mut self) {
        self.tools.clear();
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.tool_names()).finish()
    }
}

/// Build the registry with all six Ring tools.
#[must_use]
pub fn build_registry(client: Arc<RingClient>, enumeration_timeout: Duration) -> ToolRegistry {
    let mut registry = ToolRegistry::new(ToolContext::new(client, enumeration_timeout));

    registry.register_multiple(vec![
        Box::new(ListDevicesTool),
        Box::new(GetDeviceInfoTool),
        Box::new(ArmDisarmAlarmTool),
        Box::new(GetCameraSnapshotTool),
        Box::new(TurnLightOnOffTool),
        Box::new(MonitorEventsTool),
    ]);

    registry
}
