//! Ring device payloads and their normalized projections.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::DeviceId;

/// A Ring location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Opaque location id.
    pub location_id: String,

    /// Human-readable location name.
    pub name: String,
}

/// Shared connection-alert block on camera payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionAlerts {
    /// Reported connection state ("online"/"offline").
    #[serde(default)]
    pub connection: Option<String>,
}

/// A camera or doorbell as reported by the clients API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDescriptor {
    /// Numeric device id.
    pub id: u64,

    /// Display name (the API calls this "description").
    #[serde(rename = "description")]
    pub name: String,

    /// Owning location id.
    pub location_id: String,

    /// Hardware kind (e.g. "hp_cam_v1", "lpd_v2").
    pub kind: String,

    /// Battery charge; the API reports this as a number or a string.
    #[serde(default)]
    pub battery_life: Option<serde_json::Value>,

    /// Present on cameras with a controllable light.
    #[serde(default)]
    pub led_status: Option<serde_json::Value>,

    /// Present on cameras with a siren.
    #[serde(default)]
    pub siren_status: Option<serde_json::Value>,

    /// Connection alerts.
    #[serde(default)]
    pub alerts: Option<ConnectionAlerts>,

    /// Remaining payload fields, carried verbatim for detail responses.
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl CameraDescriptor {
    /// A camera is online when its connection alert reads "online".
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.alerts.as_ref().and_then(|a| a.connection.as_deref()) == Some("online")
    }

    /// Battery charge as a percentage, if the camera reports one.
    #[must_use]
    pub fn battery_percent(&self) -> Option<u8> {
        parse_battery(self.battery_life.as_ref())
    }

    /// Whether the camera has a controllable light.
    #[must_use]
    pub fn has_light(&self) -> bool {
        self.led_status.is_some()
    }

    /// Whether the camera has a siren.
    #[must_use]
    pub fn has_siren(&self) -> bool {
        self.siren_status.is_some()
    }
}

/// A hub-attached (non-camera) device as reported by the clients API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingDeviceDescriptor {
    /// Device id; numeric for some devices, an opaque string for others.
    pub id: DeviceId,

    /// Display name.
    #[serde(rename = "description")]
    pub name: String,

    /// Owning location id.
    pub location_id: String,

    /// Device type string (e.g. "sensor.contact", "switch.multilevel.beams").
    #[serde(default)]
    pub device_type: Option<String>,

    /// Ring category id; 2 marks light devices.
    #[serde(default)]
    pub category_id: Option<i64>,

    /// Battery charge; number or string.
    #[serde(default)]
    pub battery_level: Option<serde_json::Value>,

    /// Fault flag; a non-faulted device is considered online.
    #[serde(default)]
    pub faulted: Option<bool>,

    /// Remaining payload fields, carried verbatim for detail responses.
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl RingDeviceDescriptor {
    /// A generic device is online when it explicitly reports `faulted: false`.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.faulted == Some(false)
    }

    /// Battery charge as a percentage, if reported.
    #[must_use]
    pub fn battery_percent(&self) -> Option<u8> {
        parse_battery(self.battery_level.as_ref())
    }

    /// Whether this device is a controllable light.
    #[must_use]
    pub fn is_light(&self) -> bool {
        self.device_type.as_deref().is_some_and(|t| t.contains("light"))
            || self.category_id == Some(2)
    }
}

fn parse_battery(value: Option<&serde_json::Value>) -> Option<u8> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u8::try_from(v).ok()),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Normalized projection of cameras and generic devices into one shape.
///
/// Exists only transiently as a response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Device id.
    pub id: DeviceId,

    /// Display name.
    pub name: String,

    /// Device kind ("camera" or the Ring device type).
    #[serde(rename = "type")]
    pub kind: String,

    /// Hardware model (cameras only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Ring category id (generic devices only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    /// Name of the owning location.
    pub location: String,

    /// Battery charge percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,

    /// Online state, computed per device kind.
    pub online: bool,

    /// Whether the camera has a light (detail responses only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_light: Option<bool>,

    /// Whether the camera has a siren (detail responses only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_siren: Option<bool>,
}

impl DeviceInfo {
    /// Project a camera into the normalized shape.
    #[must_use]
    pub fn from_camera(camera: &CameraDescriptor, location: &str) -> Self {
        Self {
            id: DeviceId::Number(camera.id),
            name: camera.name.clone(),
            kind: "camera".to_string(),
            model: Some(camera.kind.clone()),
            category_id: None,
            location: location.to_string(),
            battery_level: camera.battery_percent(),
            online: camera.is_online(),
            has_light: None,
            has_siren: None,
        }
    }

    /// Project a generic device into the normalized shape.
    #[must_use]
    pub fn from_device(device: &RingDeviceDescriptor, location: &str) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            kind: device.device_type.clone().unwrap_or_else(|| "unknown".to_string()),
            model: None,
            category_id: device.category_id,
            location: location.to_string(),
            battery_level: device.battery_percent(),
            online: device.is_online(),
            has_light: None,
            has_siren: None,
        }
    }
}

/// Alarm mode on the wire, mapped from the user-facing names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmMode {
    /// Fully armed ("away").
    All,
    /// Partially armed ("home").
    Some,
    /// Disarmed.
    None,
}

impl AlarmMode {
    /// Map a user-facing mode name to the wire value.
    #[must_use]
    pub fn from_user(mode: &str) -> Option<Self> {
        match mode {
            "home" => Option::Some(Self::Some),
            "away" => Option::Some(Self::All),
            "disarmed" => Option::Some(Self::None),
            _ => Option::None,
        }
    }

    /// The value the mode API expects.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Some => "some",
            Self::None => "none",
        }
    }
}

/// An active ding (push-style event) from the clients API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveDing {
    /// Ding id, used for deduplication across polls.
    pub id: u64,

    /// Event kind ("ding", "motion", "on_demand", ...).
    pub kind: String,

    /// Originating device id.
    pub doorbot_id: u64,

    /// Originating device name.
    #[serde(default)]
    pub doorbot_description: String,

    /// Remaining payload fields.
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// An ephemeral event record accumulated during a monitoring window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    /// Event type ("motion_detected", "doorbell_pressed", "camera_notification").
    #[serde(rename = "type")]
    pub kind: String,

    /// ISO-8601 timestamp of observation.
    pub timestamp: String,

    /// Originating device name.
    pub device: String,

    /// Originating device id.
    pub device_id: DeviceId,

    /// Device type, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    /// Raw notification kind for events without a dedicated type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_kind: Option<String>,

    /// Raw event payload.
    pub data: serde_json::Value,
}

impl EventInfo {
    /// Classify an active ding into an event record.
    #[must_use]
    pub fn from_ding(ding: &ActiveDing) -> Self {
        let (kind, notification_kind) = match ding.kind.as_str() {
            "motion" => ("motion_detected".to_string(), Option::None),
            "ding" => ("doorbell_pressed".to_string(), Option::None),
            other => ("camera_notification".to_string(), Option::Some(other.to_string())),
        };

        Self {
            kind,
            timestamp: Utc::now().to_rfc3339(),
            device: ding.doorbot_description.clone(),
            device_id: DeviceId::Number(ding.doorbot_id),
            device_type: Option::None,
            notification_kind,
            data: serde_json::to_value(ding).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_camera(connection: &str) -> CameraDescriptor {
        serde_json::from_value(json!({
            "id": 111,
            "description": "Front Door",
            "location_id": "loc-1",
            "kind": "lpd_v2",
            "battery_life": "87",
            "led_status": "off",
            "alerts": {"connection": connection}
        }))
        .unwrap()
    }

    #[test]
    fn test_camera_online_rule() {
        assert!(sample_camera("online").is_online());
        assert!(!sample_camera("offline").is_online());
    }

    #[test]
    fn test_camera_battery_string_or_number() {
        let camera = sample_camera("online");
        assert_eq!(camera.battery_percent(), Some(87));

        let camera: CameraDescriptor = serde_json::from_value(json!({
            "id": 1, "description": "x", "location_id": "l", "kind": "k",
            "battery_life": 42
        }))
        .unwrap();
        assert_eq!(camera.battery_percent(), Some(42));
    }

    #[test]
    fn test_device_online_requires_explicit_faulted_false() {
        let device: RingDeviceDescriptor = serde_json::from_value(json!({
            "id": "zid-1", "description": "Sensor", "location_id": "l",
            "faulted": false
        }))
        .unwrap();
        assert!(device.is_online());

        let device: RingDeviceDescriptor = serde_json::from_value(json!({
            "id": "zid-2", "description": "Sensor", "location_id": "l"
        }))
        .unwrap();
        assert!(!device.is_online());
    }

    #[test]
    fn test_device_light_detection() {
        let device: RingDeviceDescriptor = serde_json::from_value(json!({
            "id": "z", "description": "Beam", "location_id": "l",
            "device_type": "switch.multilevel.beams.light"
        }))
        .unwrap();
        assert!(device.is_light());

        let device: RingDeviceDescriptor = serde_json::from_value(json!({
            "id": "z", "description": "Lamp", "location_id": "l",
            "device_type": "switch", "category_id": 2
        }))
        .unwrap();
        assert!(device.is_light());
    }

    #[test]
    fn test_alarm_mode_mapping() {
        assert_eq!(AlarmMode::from_user("home"), Some(AlarmMode::Some));
        assert_eq!(AlarmMode::from_user("away"), Some(AlarmMode::All));
        assert_eq!(AlarmMode::from_user("disarmed"), Some(AlarmMode::None));
        assert_eq!(AlarmMode::from_user("party"), None);
        assert_eq!(AlarmMode::Some.wire_value(), "some");
    }

    #[test]
    fn test_event_classification() {
        let ding: ActiveDing = serde_json::from_value(json!({
            "id": 9, "kind": "motion", "doorbot_id": 111,
            "doorbot_description": "Front Door"
        }))
        .unwrap();
        let event = EventInfo::from_ding(&ding);
        assert_eq!(event.kind, "motion_detected");
        assert!(event.notification_kind.is_none());

        let ding = ActiveDing { kind: "on_demand".into(), ..ding };
        let event = EventInfo::from_ding(&ding);
        assert_eq!(event.kind, "camera_notification");
        assert_eq!(event.notification_kind.as_deref(), Some("on_demand"));
    }

    #[test]
    fn test_device_info_serializes_camel_case_and_skips_none() {
        let camera = sample_camera("online");
        let info = DeviceInfo::from_camera(&camera, "Home");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "camera");
        assert_eq!(json["batteryLevel"], 87);
        assert_eq!(json["location"], "Home");
        assert!(json.get("categoryId").is_none());
        assert!(json.get("hasLight").is_none());
    }
}
