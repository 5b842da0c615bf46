//! Persisted token file.
//!
//! The file holds the most recently rotated refresh token so a restarted
//! process can authenticate without the user supplying a fresh credential.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Persisted credential: the whole content of the token file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// The refresh token.
    pub refresh_token: String,

    /// ISO-8601 timestamp of the last write.
    pub last_updated: String,
}

/// Reads and writes the local token file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store for the given path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the persisted token.
    ///
    /// An absent, unreadable, or malformed file is treated as "no saved
    /// token" and never as an error.
    #[must_use]
    pub fn load(&self) -> Option<TokenConfig> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(error) => {
                tracing::debug!(path = %self.path.display(), %error, "No readable token file");
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(config) => Some(config),
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "Token file is not valid JSON, treating as absent"
                );
                None
            }
        }
    }

    /// Persist a refresh token, best-effort.
    ///
    /// A write failure is logged with its consequence and never propagated;
    /// the process continues with the in-memory token.
    pub fn save(&self, refresh_token: &str) {
        let config = TokenConfig {
            refresh_token: refresh_token.to_string(),
            last_updated: Utc::now().to_rfc3339(),
        };

        let json = match serde_json::to_string_pretty(&config) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "Failed to serialize token config");
                return;
            }
        };

        match std::fs::write(&self.path, json) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Saved rotated token");
            }
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "Failed to save token");
                tracing::warn!(
                    "Future sessions may require re-authentication until the token file is writable"
                );
            }
        }
    }
}
