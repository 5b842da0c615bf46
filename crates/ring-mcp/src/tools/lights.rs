//! Light tool: turn_light_on_off.

use serde_json::json;

use super::{McpTool, ToolContext, with_timeout};
use crate::error::{ToolError, ToolResult};
use crate::models::{LightInput, ToolResponse};

/// Switches a camera light or a light-capable hub device on or off.
pub struct TurnLightOnOffTool;

#[async_trait::async_trait]
impl McpTool for TurnLightOnOffTool {
    fn name(&self) -> &'static str {
        "turn_light_on_off"
    }

    fn description(&self) -> &'static str {
        "Turn Ring light device on or off"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "deviceId": {
                    "type": "string",
                    "description": "The ID of the Ring light device"
                },
                "on": {
                    "type": "boolean",
                    "description": "Whether to turn the light on (true) or off (false)"
                }
            },
            "required": ["deviceId", "on"]
        })
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        let params: LightInput = serde_json::from_value(input)?;

        let device_id = params
            .device_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ToolError::validation("deviceId", "Device ID is required"))?;
        let on = params
            .on
            .ok_or_else(|| ToolError::validation("on", "On/off state is required"))?;

        let state = if on { "on" } else { "off" };
        let timeout = ctx.enumeration_timeout;
        let locations = with_timeout(timeout, ctx.client.get_locations()).await?;

        for location in &locations {
            let cameras =
                with_timeout(timeout, ctx.client.get_cameras(&location.location_id)).await?;

            if let Some(camera) = cameras
                .iter()
                .find(|c| c.id.to_string() == device_id && c.has_light())
            {
                ctx.client
                    .set_camera_light(camera.id, on)
                    .await
                    .map_err(ToolError::from)?;

                tracing::info!(camera = %camera.name, state, "Camera light switched");

                return Ok(ToolResponse::text(format!(
                    "Successfully turned light {state} for camera \"{}\"",
                    camera.name
                )));
            }

            let devices =
                with_timeout(timeout, ctx.client.get_devices(&location.location_id)).await?;

            if let Some(device) =
                devices.iter().find(|d| d.id.matches(&device_id) && d.is_light())
            {
                ctx.client
                    .set_device_power(&device.id.to_string(), on)
                    .await
                    .map_err(ToolError::from)?;

                tracing::info!(device = %device.name, state, "Device light switched");

                return Ok(ToolResponse::text(format!(
                    "Successfully turned light {state} for device \"{}\"",
                    device.name
                )));
            }
        }

        Err(ToolError::not_found(format!("Light device with ID {device_id} not found")))
    }
}
