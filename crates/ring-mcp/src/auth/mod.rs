//! Credential lifecycle: token resolution, connection validation with
//! retry, and persistence of rotated tokens.

mod store;

pub use store::{TokenConfig, TokenStore};

use crate::client::RingClient;
use crate::config::Config;
use crate::error::AuthError;

/// Resolves, validates, and maintains the Ring refresh token.
#[derive(Debug)]
pub struct TokenManager {
    store: TokenStore,
    cli_token: Option<String>,
    env_token: Option<String>,
    max_retries: u32,
    retry_base_delay: std::time::Duration,
    retry_max_delay: std::time::Duration,
}

impl TokenManager {
    /// Create a manager from the resolved configuration.
    ///
    /// The environment token is injected by the caller so the precedence
    /// logic stays pure; `main` passes `RING_REFRESH_TOKEN`.
    #[must_use]
    pub fn new(config: &Config, env_token: Option<String>) -> Self {
        Self {
            store: TokenStore::new(config.token_file.clone()),
            cli_token: config.cli_token.clone(),
            env_token,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
            retry_max_delay: config.retry_max_delay,
        }
    }

    /// Resolve the refresh token by strict precedence:
    /// CLI argument, then environment variable, then the persisted file.
    ///
    /// # Errors
    ///
    /// Fails fast on an empty CLI value; fails with [`AuthError::NoToken`]
    /// when no mechanism supplies a token.
    pub fn resolve_refresh_token(&self) -> Result<String, AuthError> {
        if let Some(token) = &self.cli_token {
            if token.is_empty() {
                return Err(AuthError::EmptyCliToken);
            }
            tracing::info!("Using token from command line argument");
            return Ok(token.clone());
        }

        if let Some(token) = &self.env_token {
            if !token.is_empty() {
                tracing::info!("Using token from RING_REFRESH_TOKEN environment variable");
                return Ok(token.clone());
            }
        }

        if let Some(config) = self.store.load() {
            tracing::info!("Using token from config file");
            return Ok(config.refresh_token);
        }

        Err(AuthError::NoToken)
    }

    /// Confirm the resolved token actually authenticates, retrying with
    /// capped exponential backoff. The only retry policy in the system.
    ///
    /// # Errors
    ///
    /// Fails with [`AuthError::ValidationFailed`] once retries are
    /// exhausted, naming the total attempt count and the last error.
    pub async fn validate_connection(&self, client: &RingClient) -> Result<(), AuthError> {
        let attempts = self.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 0..attempts {
            tracing::info!(attempt = attempt + 1, total = attempts, "Validating Ring API connection");

            match client.get_locations().await {
                Ok(locations) => {
                    tracing::info!(locations = locations.len(), "Connected successfully");
                    return Ok(());
                }
                Err(error) => {
                    last_error = error.to_string();
                    tracing::warn!(
                        attempt = attempt + 1,
                        total = attempts,
                        %error,
                        "Ring API connection validation failed"
                    );
                }
            }

            if attempt + 1 < attempts {
                let delay = self.backoff_delay(attempt);
                tracing::info!(delay_ms = delay.as_millis() as u64, "Retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(AuthError::ValidationFailed { attempts, message: last_error })
    }

    /// Backoff before the next validation attempt: doubles from the base
    /// delay and never exceeds the cap.
    fn backoff_delay(&self, attempt: u32) -> std::time::Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.retry_max_delay)
    }

    /// Persist every refresh token the Ring cloud rotates in, so future
    /// process restarts keep authenticating.
    pub fn spawn_rotation_persistence(&self, client: &RingClient) {
        let mut rotations = client.subscribe_token_rotations();
        let store = self.store.clone();

        tokio::spawn(async move {
            while rotations.changed().await.is_ok() {
                let token = rotations.borrow_and_update().clone();
                store.save(&token);
            }
        });
    }

    /// Resolve the token, construct the client, wire rotation persistence,
    /// and validate connectivity. Sole entry point used by the server.
    ///
    /// # Errors
    ///
    /// Returns error when no token can be resolved, the client cannot be
    /// constructed, or validation exhausts its retries.
    pub async fn initialize(&self, config: &Config) -> anyhow::Result<RingClient> {
        let refresh_token = self.resolve_refresh_token()?;
        let client = RingClient::new(config, refresh_token)?;

        self.spawn_rotation_persistence(&client);
        self.validate_connection(&client).await?;

        tracing::info!("Ring API initialized and validated");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn manager(
        cli: Option<&str>,
        env: Option<&str>,
        token_file: PathBuf,
    ) -> TokenManager {
        let config =
            Config { cli_token: cli.map(String::from), token_file, ..Config::default() };
        TokenManager::new(&config, env.map(String::from))
    }

    #[test]
    fn test_precedence_cli_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring-config.json");
        TokenStore::new(path.clone()).save("file-token");

        let mgr = manager(Some("cli-token"), Some("env-token"), path);
        assert_eq!(mgr.resolve_refresh_token().unwrap(), "cli-token");
    }

    #[test]
    fn test_precedence_env_then_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring-config.json");
        TokenStore::new(path.clone()).save("file-token");

        let mgr = manager(None, Some("env-token"), path.clone());
        assert_eq!(mgr.resolve_refresh_token().unwrap(), "env-token");

        let mgr = manager(None, None, path);
        assert_eq!(mgr.resolve_refresh_token().unwrap(), "file-token");
    }

    #[test]
    fn test_no_token_anywhere_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(None, None, dir.path().join("absent.json"));
        assert!(matches!(mgr.resolve_refresh_token(), Err(AuthError::NoToken)));
    }

    #[test]
    fn test_backoff_delays_double_up_to_the_cap() {
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(None, None, dir.path().join("ring-config.json"));

        let delays: Vec<_> = (0..6).map(|attempt| mgr.backoff_delay(attempt)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
                Duration::from_secs(10),
                Duration::from_secs(10),
            ]
        );
        assert!(delays.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_empty_cli_token_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring-config.json");
        TokenStore::new(path.clone()).save("file-token");

        // An empty --token= must not fall through to the file.
        let mgr = manager(Some(""), None, path);
        assert!(matches!(mgr.resolve_refresh_token(), Err(AuthError::EmptyCliToken)));
    }
}
