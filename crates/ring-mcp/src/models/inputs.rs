//! Input models for MCP tool parameters.
//!
//! Required fields are declared optional here so each tool can report a
//! field-specific validation error instead of a generic decode failure.

use serde::{Deserialize, Serialize};

/// Input for `get_device_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfoInput {
    /// The ID of the Ring device.
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Input for `arm_disarm_alarm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmDisarmInput {
    /// The location ID where the alarm is located.
    #[serde(default)]
    pub location_id: Option<String>,

    /// The alarm mode to set ("home", "away", "disarmed").
    #[serde(default)]
    pub mode: Option<String>,
}

/// Input for `get_camera_snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInput {
    /// The ID of the Ring camera device.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Whether to attach the image for analysis.
    #[serde(default = "default_true")]
    pub analyze_image: bool,
}

/// Input for `turn_light_on_off`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightInput {
    /// The ID of the Ring light device.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Whether to turn the light on (true) or off (false).
    #[serde(default)]
    pub on: Option<bool>,
}

/// Input for `monitor_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorEventsInput {
    /// Duration in seconds to monitor events; fractional values are valid.
    #[serde(default = "default_duration")]
    pub duration: f64,
}

fn default_true() -> bool {
    true
}

fn default_duration() -> f64 {
    30.0
}
