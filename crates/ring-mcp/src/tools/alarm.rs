//! Alarm tool: arm_disarm_alarm.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::{ToolError, ToolResult};
use crate::models::{AlarmMode, ArmDisarmInput, ToolResponse};

/// Arms or disarms the alarm at a location.
pub struct ArmDisarmAlarmTool;

#[async_trait::async_trait]
impl McpTool for ArmDisarmAlarmTool {
    fn name(&self) -> &'static str {
        "arm_disarm_alarm"
    }

    fn description(&self) -> &'static str {
        "Arm or disarm the Ring alarm system"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "locationId": {
                    "type": "string",
                    "description": "The location ID where the alarm is located"
                },
                "mode": {
                    "type": "string",
                    "enum": ["home", "away", "disarmed"],
                    "description": "The alarm mode to set"
                }
            },
            "required": ["locationId", "mode"]
        })
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        let params: ArmDisarmInput = serde_json::from_value(input)?;

        let location_id = params
            .location_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ToolError::validation("locationId", "Location ID is required"))?;
        let mode = params
            .mode
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ToolError::validation("mode", "Mode is required"))?;

        let alarm_mode = AlarmMode::from_user(&mode)
            .ok_or_else(|| ToolError::validation("mode", format!("Invalid mode: {mode}")))?;

        let locations = ctx.client.get_locations().await.map_err(ToolError::from)?;
        let location = locations
            .iter()
            .find(|l| l.location_id == location_id)
            .ok_or_else(|| {
                ToolError::not_found(format!("Location with ID {location_id} not found"))
            })?;

        ctx.client
            .set_alarm_mode(&location.location_id, alarm_mode)
            .await
            .map_err(ToolError::from)?;

        tracing::info!(location = %location.name, mode = %mode, "Alarm mode updated");

        Ok(ToolResponse::text(format!(
            "Successfully set alarm mode to \"{mode}\" for location \"{}\"",
            location.name
        )))
    }
}
