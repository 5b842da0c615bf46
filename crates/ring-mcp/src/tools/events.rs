//! Event tool: monitor_events.

use std::time::{Duration, Instant};

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::ToolResult;
use crate::models::{EventInfo, MonitorEventsInput, ToolResponse};

/// Accumulates push-style events for a bounded monitoring window.
///
/// The subscription handle is scoped to this call; dropping it at the end
/// of the window releases the underlying polling task.
pub struct MonitorEventsTool;

#[async_trait::async_trait]
impl McpTool for MonitorEventsTool {
    fn name(&self) -> &'static str {
        "monitor_events"
    }

    fn description(&self) -> &'static str {
        "Monitor real-time Ring events (doorbell presses, motion detection, etc.)"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "duration": {
                    "type": "number",
                    "description": "Duration in seconds to monitor events (default: 30)"
                }
            }
        })
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> ToolResult<ToolResponse> {
        let params: MonitorEventsInput = serde_json::from_value(input)?;
        // Negative and non-finite durations collapse to an empty window.
        let duration = if params.duration.is_finite() {
            params.duration.clamp(0.0, f64::from(u32::MAX))
        } else {
            0.0
        };

        tracing::info!(duration_secs = duration, "Monitoring Ring events");

        let started = Instant::now();
        let mut events: Vec<EventInfo> = Vec::new();
        let mut subscription = ctx.client.subscribe_events();

        let window = tokio::time::sleep(Duration::from_secs_f64(duration));
        tokio::pin!(window);

        loop {
            tokio::select! {
                () = &mut window => break,
                event = subscription.recv() => match event {
                    Some(event) => events.push(event),
                    None => break,
                },
            }
        }

        drop(subscription);

        let elapsed = started.elapsed().as_secs_f64();
        let detected = events.len();
        let result = json!({
            "monitoringDuration": format!("{duration} seconds"),
            "actualDuration": format!("{elapsed:.1} seconds"),
            "eventsDetected": detected,
            "events": events,
        });

        tracing::info!(events = detected, "Monitoring window closed");

        Ok(ToolResponse::json(&result)?)
    }
}
