//! Data models: Ring API payloads, normalized projections, and the MCP
//! response envelope.

mod devices;
mod inputs;

pub use devices::{
    ActiveDing, AlarmMode, CameraDescriptor, DeviceInfo, EventInfo, Location, RingDeviceDescriptor,
};
pub use inputs::{
    ArmDisarmInput, DeviceInfoInput, LightInput, MonitorEventsInput, SnapshotInput,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A device identifier as the Ring cloud reports it.
///
/// Cameras carry numeric ids while hub-attached devices use opaque strings;
/// tool arguments always arrive as strings and are compared textually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    /// Numeric id (cameras, doorbells).
    Number(u64),
    /// String id (hub-attached devices).
    Text(String),
}

impl DeviceId {
    /// Compare against a string-typed tool argument.
    #[must_use]
    pub fn matches(&self, requested: &str) -> bool {
        match self {
            Self::Number(n) => n.to_string() == requested,
            Self::Text(s) => s == requested,
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One part of an MCP tool response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    /// Plain text content.
    Text {
        /// The text payload.
        text: String,
    },
    /// Base64-encoded image content.
    Image {
        /// Base64-encoded image bytes.
        data: String,
        /// MIME type of the image.
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// The protocol envelope returned from a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Content parts (text and/or image).
    pub content: Vec<ContentPart>,

    /// Set when the envelope reports a business-logic failure.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResponse {
    /// Build a single-part text response.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![ContentPart::Text { text: text.into() }], is_error: None }
    }

    /// Build a pretty-printed JSON-as-text response.
    pub fn json(value: &impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }

    /// Extract the first text part, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            ContentPart::Image { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_matches_both_shapes() {
        assert!(DeviceId::Number(12345).matches("12345"));
        assert!(!DeviceId::Number(12345).matches("54321"));
        assert!(DeviceId::Text("zid-abc".into()).matches("zid-abc"));
    }

    #[test]
    fn test_device_id_untagged_deserialization() {
        let id: DeviceId = serde_json::from_str("42").unwrap();
        assert_eq!(id, DeviceId::Number(42));

        let id: DeviceId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, DeviceId::Text("abc".into()));
    }

    #[test]
    fn test_text_response_envelope() {
        let response = ToolResponse::text("hello");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "hello");
        assert!(json.get("isError").is_none());
    }

    #[test]
    fn test_image_part_serialization() {
        let part = ContentPart::Image { data: "YWJj".into(), mime_type: "image/jpeg".into() };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["mimeType"], "image/jpeg");
    }
}
