//! Camera tool: get_camera_snapshot.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use super::{McpTool, ToolContext, with_timeout};
use crate::error::{ToolError, ToolResult};
use crate::models::{ContentPart, SnapshotInput, ToolResponse};

/// Captures a snapshot from a camera, optionally attaching the image.
pub struct GetCameraSnapshotTool;

#[async_trait::async_trait]
impl McpTool for GetCameraSnapshotTool {
    fn name(&self) -> &'static str {
        "get_camera_snapshot"
    }

    fn description(&self) -> &'static str {
        "Get a snapshot from a Ring camera and analyze what's visible in the image"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "deviceId": {
                    "type": "string",
                    "description": "The ID of the Ring camera device"
                },
                "analyzeImage": {
                    "type": "boolean",
                    "description": "Whether to analyze the image content (default: true)",
                    "default": true
                }
            },
            "required": ["deviceId"]
        })
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        let params: SnapshotInput = serde_json::from_value(input)?;
        let device_id = params
            .device_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ToolError::validation("deviceId", "Device ID is required"))?;

        let timeout = ctx.enumeration_timeout;
        let locations = with_timeout(timeout, ctx.client.get_locations()).await?;

        for location in &locations {
            let cameras =
                with_timeout(timeout, ctx.client.get_cameras(&location.location_id)).await?;

            if let Some(camera) = cameras.iter().find(|c| c.id.to_string() == device_id) {
                let snapshot =
                    ctx.client.get_snapshot(camera.id).await.map_err(ToolError::from)?;
                let encoded = BASE64.encode(&snapshot);

                tracing::info!(
                    camera = %camera.name,
                    bytes = snapshot.len(),
                    "Snapshot captured"
                );

                if params.analyze_image {
                    return Ok(ToolResponse {
                        content: vec![
                            ContentPart::Text {
                                text: format!(
                                    "Snapshot captured from camera \"{}\". Analyzing image content...",
                                    camera.name
                                ),
                            },
                            ContentPart::Image {
                                data: encoded,
                                mime_type: "image/jpeg".to_string(),
                            },
                        ],
                        is_error: Some(false),
                    });
                }

                return Ok(ToolResponse::text(format!(
                    "Snapshot captured from camera \"{}\". Image data: {} bytes (base64 encoded)",
                    camera.name,
                    encoded.len()
                )));
            }
        }

        Err(ToolError::not_found(format!("Camera with ID {device_id} not found")))
    }
}
