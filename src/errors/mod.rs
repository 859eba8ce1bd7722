//! Error handling module for the notice board client.
//!
//! Provides a single error type covering transport failures, server rejections
//! and drift in the local notification cache, each mapped to a stable code.

use serde::Deserialize;
use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NETWORK_FAILURE: &str = "NETWORK_FAILURE";
    pub const REMOTE_REJECTION: &str = "REMOTE_REJECTION";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";
    pub const LOCAL_STATE_INCONSISTENCY: &str = "LOCAL_STATE_INCONSISTENCY";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not complete (connect, DNS, reset).
    #[error("network failure: {0}")]
    Network(String),
    /// The server answered with an error status.
    #[error("request rejected ({status}): {message}")]
    Remote { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The cached unread counter drifted from the cached notifications.
    #[error("local state inconsistency: {0}")]
    Inconsistency(String),
    /// Rejected locally before anything was sent.
    #[error("validation error: {0}")]
    Validation(String),
    /// The current user lacks the capability for the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Bad configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Get the HTTP status carried by a remote rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => codes::NETWORK_FAILURE,
            ClientError::Remote { status: 401, .. } => codes::UNAUTHORIZED,
            ClientError::Remote { status: 404, .. } => codes::NOT_FOUND,
            ClientError::Remote { .. } => codes::REMOTE_REJECTION,
            ClientError::InvalidResponse(_) => codes::INVALID_RESPONSE,
            ClientError::Inconsistency(_) => codes::LOCAL_STATE_INCONSISTENCY,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Forbidden(_) => codes::FORBIDDEN,
            ClientError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Message suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Could not reach the notice board. Check your connection and try again.".to_string()
            }
            ClientError::Remote { message, .. } => message.clone(),
            ClientError::InvalidResponse(_) => {
                "The notice board sent a response we could not read.".to_string()
            }
            ClientError::Inconsistency(_) => {
                "Notifications may be out of date. Reload to refresh them.".to_string()
            }
            ClientError::Validation(msg) | ClientError::Forbidden(msg) => msg.clone(),
            ClientError::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Remote { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Response decode error: {:?}", err);
            ClientError::InvalidResponse(err.to_string())
        } else if err.is_connect() {
            tracing::error!("Connection error: {:?}", err);
            ClientError::Network(format!("connection failed: {}", err))
        } else {
            tracing::error!("HTTP error: {:?}", err);
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::InvalidResponse(format!("JSON error: {}", err))
    }
}

/// Error body returned by the notice board API.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, falling back to the status reason phrase.
    pub fn message_or(body: &str, fallback: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_by_status() {
        let unauthorized = ClientError::Remote {
            status: 401,
            message: "Token missing".to_string(),
        };
        let missing = ClientError::Remote {
            status: 404,
            message: "Notice not found".to_string(),
        };
        let conflict = ClientError::Remote {
            status: 400,
            message: "Notice is not pending".to_string(),
        };

        assert_eq!(unauthorized.error_code(), codes::UNAUTHORIZED);
        assert_eq!(missing.error_code(), codes::NOT_FOUND);
        assert!(missing.is_not_found());
        assert_eq!(conflict.error_code(), codes::REMOTE_REJECTION);
        assert_eq!(conflict.status_code(), Some(400));
        assert_eq!(conflict.user_message(), "Notice is not pending");
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ErrorBody::message_or(r#"{"message":"Invalid credentials"}"#, "Unauthorized"),
            "Invalid credentials"
        );
        assert_eq!(
            ErrorBody::message_or(r#"{"error":"boom"}"#, "Internal Server Error"),
            "boom"
        );
        assert_eq!(
            ErrorBody::message_or("<html>oops</html>", "Bad Gateway"),
            "Bad Gateway"
        );
        assert_eq!(
            ErrorBody::message_or(r#"{"message":"  "}"#, "Bad Request"),
            "Bad Request"
        );
    }

    #[test]
    fn test_local_errors_have_no_status() {
        let err = ClientError::Inconsistency("unread 2, cached 1".to_string());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.error_code(), codes::LOCAL_STATE_INCONSISTENCY);
    }
}
