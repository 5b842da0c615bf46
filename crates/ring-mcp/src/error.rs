//! Error types for the Ring MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from the Ring HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential rejected by the Ring cloud (401 response)
    #[error("Authentication rejected: {message}")]
    Unauthorized {
        /// Error message from the API
        message: String,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Map a non-success HTTP status and body to the matching variant.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { message: body },
            404 => Self::NotFound { resource: body },
            500..=599 => Self::Server { status, message: body },
            _ => Self::UnexpectedStatus { status, message: body },
        }
    }

    /// Returns true if this error indicates a transient condition.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Server { .. })
    }
}

/// Errors from credential resolution and connection validation.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// No refresh token was supplied through any mechanism.
    #[error(
        "No Ring refresh token found. Provide one via:\n\
         - Command line: ring-mcp --token=<refresh token>\n\
         - Environment variable: RING_REFRESH_TOKEN=<refresh token>\n\
         - Saved token in ring-config.json\n\n\
         The server cannot start without valid Ring credentials."
    )]
    NoToken,

    /// A `--token=` argument was present but carried no value.
    #[error("No token provided in command line argument")]
    EmptyCliToken,

    /// Connection validation exhausted its retries.
    #[error(
        "Ring API authentication failed after {attempts} attempts: {message}\n\n\
         This usually means:\n\
         - Your refresh token has expired\n\
         - Your Ring account credentials have changed\n\
         - The Ring API is temporarily unavailable\n\n\
         Re-run with --token=<refresh token> to supply a fresh credential."
    )]
    ValidationFailed {
        /// Total attempts made (retries + 1).
        attempts: u32,
        /// Last underlying error message.
        message: String,
    },
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the Ring client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Requested entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// No tool is registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal tool logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Convert to a user-friendly error message for MCP response payloads.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::Unauthorized { message }) => {
                format!("Ring rejected the credentials: {message}. The refresh token may have expired.")
            }
            Self::Client(ClientError::Timeout(duration)) => {
                format!("Ring API call timed out after {duration:?}")
            }
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::NotFound(message) => message.clone(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_from_status() {
        assert!(matches!(
            ClientError::from_status(401, "bad token".into()),
            ClientError::Unauthorized { .. }
        ));
        assert!(matches!(
            ClientError::from_status(404, "nope".into()),
            ClientError::NotFound { .. }
        ));
        assert!(matches!(
            ClientError::from_status(503, "down".into()),
            ClientError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ClientError::from_status(418, "teapot".into()),
            ClientError::UnexpectedStatus { status: 418, .. }
        ));
    }

    #[test]
    fn test_client_error_transient() {
        assert!(ClientError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(ClientError::server(502, "bad gateway").is_transient());
        assert!(!ClientError::unauthorized("expired").is_transient());
    }

    #[test]
    fn test_auth_error_messages() {
        let err = AuthError::NoToken;
        let msg = err.to_string();
        assert!(msg.contains("--token="));
        assert!(msg.contains("RING_REFRESH_TOKEN"));
        assert!(msg.contains("ring-config.json"));

        let err = AuthError::ValidationFailed { attempts: 4, message: "401".into() };
        assert!(err.to_string().contains("4 attempts"));
        assert!(err.to_string().contains("refresh token has expired"));
    }

    #[test]
    fn test_tool_error_user_message() {
        let err = ToolError::validation("mode", "Invalid mode: party");
        assert!(err.to_user_message().contains("mode"));
        assert!(err.to_user_message().contains("Invalid mode"));

        let err = ToolError::not_found("Device with ID 42 not found");
        assert_eq!(err.to_user_message(), "Device with ID 42 not found");
    }
}
