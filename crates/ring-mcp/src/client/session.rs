//! Authenticated OAuth session against the Ring cloud.
//!
//! Exchanges the long-lived refresh token for short-lived access tokens and
//! publishes rotated refresh tokens on a watch channel so they can be
//! persisted for future process restarts.

use std::time::Instant;

use serde::Deserialize;
use tokio::sync::{Mutex, watch};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Response of the OAuth refresh-token grant.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

struct SessionState {
    refresh_token: String,
    access_token: Option<CachedToken>,
}

/// OAuth session holding the refresh token and a cached access token.
pub struct AuthSession {
    http: reqwest::Client,
    oauth_url: String,
    hardware_id: String,
    state: Mutex<SessionState>,
    rotations: watch::Sender<String>,
}

impl AuthSession {
    /// Create a session from a resolved refresh token.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &Config, refresh_token: String) -> Self {
        let (rotations, _) = watch::channel(refresh_token.clone());

        Self {
            http,
            oauth_url: config.oauth_url.clone(),
            hardware_id: uuid::Uuid::new_v4().to_string(),
            state: Mutex::new(SessionState { refresh_token, access_token: None }),
            rotations,
        }
    }

    /// Subscribe to refresh-token rotations.
    ///
    /// The receiver observes every token the Ring cloud rotates in during
    /// this session; the initial value is the token the session started with.
    #[must_use]
    pub fn subscribe_rotations(&self) -> watch::Receiver<String> {
        self.rotations.subscribe()
    }

    /// Return a valid access token, exchanging the refresh token if the
    /// cached one is absent or near expiry.
    pub async fn access_token(&self) -> ClientResult<String> {
        let mut state = self.state.lock().await;

        if let Some(cached) = &state.access_token {
            if Instant::now() < cached.expires_at {
                return Ok(cached.token.clone());
            }
        }

        let grant = self.exchange(&state.refresh_token).await?;

        if grant.refresh_token != state.refresh_token {
            tracing::info!("Ring rotated the refresh token");
            state.refresh_token = grant.refresh_token.clone();
            // Nobody listening is fine; persistence is best-effort.
            let _ = self.rotations.send(grant.refresh_token);
        }

        let expires_at = Instant::now()
            + std::time::Duration::from_secs(grant.expires_in)
                .saturating_sub(api::TOKEN_EXPIRY_MARGIN);

        state.access_token =
            Some(CachedToken { token: grant.access_token.clone(), expires_at });

        Ok(grant.access_token)
    }

    async fn exchange(&self, refresh_token: &str) -> ClientResult<TokenGrant> {
        tracing::debug!("Exchanging refresh token for access token");

        let response = self
            .http
            .post(&self.oauth_url)
            .header("2fa-support", "true")
            .header("hardware_id", &self.hardware_id)
            .json(&serde_json::json!({
                "grant_type": "refresh_token",
                "client_id": api::OAUTH_CLIENT_ID,
                "refresh_token": refresh_token,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").field("oauth_url", &self.oauth_url).finish()
    }
}
