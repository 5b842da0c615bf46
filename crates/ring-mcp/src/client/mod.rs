//! Ring cloud API client.
//!
//! A thin typed client over the Ring REST surface the tools need:
//! device enumeration, the location mode API, snapshots, light control,
//! and active-ding polling. Authentication is delegated to [`AuthSession`].

mod events;
mod session;

pub use events::EventSubscription;
pub use session::AuthSession;

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{ActiveDing, AlarmMode, CameraDescriptor, Location, RingDeviceDescriptor};

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    user_locations: Vec<Location>,
}

#[derive(Debug, Default, Deserialize)]
struct RingDevicesResponse {
    #[serde(default)]
    doorbots: Vec<CameraDescriptor>,
    #[serde(default)]
    stickup_cams: Vec<CameraDescriptor>,
    #[serde(default)]
    other: Vec<RingDeviceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ActiveDingsResponse(Vec<ActiveDing>);

/// Authenticated client for the Ring cloud API.
///
/// Cheap to clone; the OAuth session is shared.
#[derive(Debug, Clone)]
pub struct RingClient {
    http: reqwest::Client,
    session: Arc<AuthSession>,
    api_base: String,
    event_poll_interval: std::time::Duration,
}

impl RingClient {
    /// Create a client bound to the given refresh token.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config, refresh_token: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let session = Arc::new(AuthSession::new(http.clone(), config, refresh_token));

        Ok(Self {
            http,
            session,
            api_base: config.api_base.clone(),
            event_poll_interval: config.event_poll_interval,
        })
    }

    /// Subscribe to refresh-token rotations for persistence.
    #[must_use]
    pub fn subscribe_token_rotations(&self) -> watch::Receiver<String> {
        self.session.subscribe_rotations()
    }

    /// List all locations on the account.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_locations(&self) -> ClientResult<Vec<Location>> {
        let response: LocationsResponse = self.get_json("/devices/v1/locations").await?;
        Ok(response.user_locations)
    }

    /// List cameras (doorbells and stickup cams) in a location.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_cameras(&self, location_id: &str) -> ClientResult<Vec<CameraDescriptor>> {
        let devices: RingDevicesResponse = self.get_json("/clients_api/ring_devices").await?;

        Ok(devices
            .doorbots
            .into_iter()
            .chain(devices.stickup_cams)
            .filter(|camera| camera.location_id == location_id)
            .collect())
    }

    /// List hub-attached (non-camera) devices in a location.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_devices(&self, location_id: &str) -> ClientResult<Vec<RingDeviceDescriptor>> {
        let devices: RingDevicesResponse = self.get_json("/clients_api/ring_devices").await?;

        Ok(devices
            .other
            .into_iter()
            .filter(|device| device.location_id == location_id)
            .collect())
    }

    /// Set the alarm mode for a location.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn set_alarm_mode(&self, location_id: &str, mode: AlarmMode) -> ClientResult<()> {
        let path = format!("/api/v1/mode/location/{location_id}");
        let body = serde_json::json!({ "mode": mode.wire_value() });

        self.post_json(&path, &body).await
    }

    /// Capture a snapshot from a camera; returns JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_snapshot(&self, camera_id: u64) -> ClientResult<Vec<u8>> {
        let url = format!("{}/clients_api/snapshots/image/{camera_id}", self.api_base);
        let token = self.session.access_token().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Turn a camera's light on or off.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn set_camera_light(&self, camera_id: u64, on: bool) -> ClientResult<()> {
        let state = if on { "floodlight_light_on" } else { "floodlight_light_off" };
        let path = format!("/clients_api/doorbots/{camera_id}/{state}");

        self.put_json(&path, &serde_json::json!({})).await
    }

    /// Switch a hub-attached device on or off.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn set_device_power(&self, device_id: &str, on: bool) -> ClientResult<()> {
        let path = format!("/clients_api/device/{device_id}");
        let body = serde_json::json!({ "device": { "v1": { "on": on } } });

        self.put_json(&path, &body).await
    }

    /// Fetch currently active dings (motion, doorbell presses, ...).
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn active_dings(&self) -> ClientResult<Vec<ActiveDing>> {
        let response: ActiveDingsResponse = self.get_json("/clients_api/dings/active").await?;
        Ok(response.0)
    }

    /// Open a scoped event subscription backed by a polling task.
    #[must_use]
    pub fn subscribe_events(&self) -> EventSubscription {
        EventSubscription::start(self.clone(), self.event_poll_interval)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}{path}", self.api_base);
        let token = self.session.access_token().await?;

        let response = self.http.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> ClientResult<()> {
        let url = format!("{}{path}", self.api_base);
        let token = self.session.access_token().await?;

        let response = self.http.post(url).bearer_auth(token).json(body).send().await?;
        Self::expect_success(response).await
    }

    async fn put_json(&self, path: &str, body: &serde_json::Value) -> ClientResult<()> {
        let url = format!("{}{path}", self.api_base);
        let token = self.session.access_token().await?;

        let response = self.http.put(url).bearer_auth(token).json(body).send().await?;
        Self::expect_success(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn expect_success(response: reqwest::Response) -> ClientResult<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        Ok(())
    }
}
