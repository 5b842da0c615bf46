//! Configuration for the Ring MCP server.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// OAuth token endpoint for the refresh-token grant.
    pub const OAUTH_URL: &str = "https://oauth.ring.com/oauth/token";

    /// Base URL for the Ring clients API.
    pub const API_BASE: &str = "https://api.ring.com";

    /// OAuth client id Ring issues tokens against.
    pub const OAUTH_CLIENT_ID: &str = "ring_official_android";

    /// Request timeout for control operations (alarm, lights, snapshots).
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Per-call timeout for enumeration calls inside tools.
    ///
    /// The upstream behavior was a fixed one-second race; kept as a
    /// configurable parameter since cloud latency routinely exceeds it.
    pub const ENUMERATION_TIMEOUT: Duration = Duration::from_secs(1);

    /// Polling interval for active-event subscriptions.
    pub const EVENT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// Base delay for connection-validation backoff.
    pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

    /// Cap on connection-validation backoff.
    pub const RETRY_MAX_DELAY: Duration = Duration::from_millis(10_000);

    /// Default retry count for connection validation (4 attempts total).
    pub const MAX_RETRIES: u32 = 3;

    /// Access tokens are refreshed this long before they expire.
    pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
}

/// Default file name for the persisted token, relative to the working directory.
pub const DEFAULT_TOKEN_FILE: &str = "ring-config.json";

/// The single origin the HTTP transport allows for CORS.
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Refresh token supplied on the command line, if any.
    pub cli_token: Option<String>,

    /// Path of the persisted token file.
    pub token_file: PathBuf,

    /// Retries for the initial connection validation.
    pub max_retries: u32,

    /// OAuth token endpoint (overridable for mock servers).
    pub oauth_url: String,

    /// Clients API base URL (overridable for mock servers).
    pub api_base: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Per-call timeout for enumeration calls inside tools.
    pub enumeration_timeout: Duration,

    /// Polling interval for event subscriptions.
    pub event_poll_interval: Duration,

    /// Base delay for validation backoff.
    pub retry_base_delay: Duration,

    /// Cap on validation backoff.
    pub retry_max_delay: Duration,
}

impl Config {
    /// Create a configuration with production endpoints.
    #[must_use]
    pub fn new(cli_token: Option<String>, token_file: Option<PathBuf>) -> Self {
        Self {
            cli_token,
            token_file: token_file.unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE)),
            max_retries: api::MAX_RETRIES,
            oauth_url: api::OAUTH_URL.to_string(),
            api_base: api::API_BASE.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            enumeration_timeout: api::ENUMERATION_TIMEOUT,
            event_poll_interval: api::EVENT_POLL_INTERVAL,
            retry_base_delay: api::RETRY_BASE_DELAY,
            retry_max_delay: api::RETRY_MAX_DELAY,
        }
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            cli_token: Some("test-refresh-token".to_string()),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            max_retries: api::MAX_RETRIES,
            oauth_url: format!("{base_url}/oauth/token"),
            api_base: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            enumeration_timeout: Duration::from_secs(5),
            event_poll_interval: Duration::from_millis(20),
            retry_base_delay: Duration::from_millis(1), // No real backoff in tests
            retry_max_delay: Duration::from_millis(4),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Transport selection, built once from process arguments.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Selected transport.
    pub transport: TransportKind,

    /// Port for the HTTP transport.
    pub port: u16,

    /// Host for the HTTP transport.
    pub host: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { transport: TransportKind::Stdio, port: 3000, host: "localhost".to_string() }
    }
}

/// The two terminal transport variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Protocol bound to process standard streams.
    Stdio,
    /// Protocol bound to an HTTP listener with SSE.
    Http,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.cli_token.is_none());
        assert_eq!(config.token_file, PathBuf::from("ring-config.json"));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.oauth_url, api::OAUTH_URL);
    }

    #[test]
    fn test_config_for_testing_rewrites_endpoints() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.oauth_url, "http://127.0.0.1:9999/oauth/token");
        assert_eq!(config.api_base, "http://127.0.0.1:9999");
        assert!(config.retry_base_delay < Duration::from_millis(10));
    }

    #[test]
    fn test_server_options_default() {
        let opts = ServerOptions::default();
        assert_eq!(opts.transport, TransportKind::Stdio);
        assert_eq!(opts.port, 3000);
        assert_eq!(opts.host, "localhost");
    }
}
