//! Error types for backend API calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API errors for consistent error handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Transport failure: DNS, refused connection, timeout
    Network,
    /// Missing or rejected credentials (HTTP 401)
    Auth,
    /// Payload rejected by server-side validation (HTTP 422)
    Validation,
    /// Any other failure
    Unknown,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Auth => write!(f, "auth"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Structured error from the backend with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error from a non-success HTTP response.
    ///
    /// 401 maps to `Auth`, 422 to `Validation`, everything else to `Unknown`.
    /// The backend puts a human-readable summary in a top-level `message`
    /// field of the JSON body; that becomes the display message when present.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 => ApiErrorKind::Auth,
            422 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Unknown,
        };

        if let Ok(json) = serde_json::from_str::<Value>(body)
            && let Some(msg) = json.get("message").and_then(|v| v.as_str())
            && !msg.is_empty()
        {
            return Self {
                kind,
                message: msg.to_string(),
                details: Some(body.to_string()),
            };
        }

        Self {
            kind,
            message: format!("HTTP {status}"),
            details: if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            },
        }
    }

    /// Returns true for credential failures (HTTP 401).
    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// 401 responses classify as auth errors.
    #[test]
    fn test_http_status_401_is_auth() {
        let err = ApiError::http_status(401, "{\"message\":\"Unauthenticated.\"}");
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(err.message, "Unauthenticated.");
        assert!(err.is_auth());
    }

    /// 422 responses classify as validation errors and surface the server message.
    #[test]
    fn test_http_status_422_is_validation() {
        let body = "{\"message\":\"The email field is required.\",\"errors\":{\"email\":[\"The email field is required.\"]}}";
        let err = ApiError::http_status(422, body);
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.message, "The email field is required.");
        assert_eq!(err.details.as_deref(), Some(body));
    }

    /// Other statuses classify as unknown.
    #[test]
    fn test_http_status_other_is_unknown() {
        let err = ApiError::http_status(500, "");
        assert_eq!(err.kind, ApiErrorKind::Unknown);
        assert_eq!(err.message, "HTTP 500");
        assert!(err.details.is_none());
    }

    /// Non-JSON bodies fall back to the status line, raw body kept as details.
    #[test]
    fn test_http_status_non_json_body() {
        let err = ApiError::http_status(502, "<html>Bad Gateway</html>");
        assert_eq!(err.kind, ApiErrorKind::Unknown);
        assert_eq!(err.message, "HTTP 502");
        assert_eq!(err.details.as_deref(), Some("<html>Bad Gateway</html>"));
    }

    /// Display shows the message only.
    #[test]
    fn test_display_is_message() {
        let err = ApiError::new(ApiErrorKind::Network, "Connection failed");
        assert_eq!(err.to_string(), "Connection failed");
    }

    /// Kind serializes in snake_case.
    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ApiErrorKind::Validation).unwrap();
        assert_eq!(json, "\"validation\"");
        let kind: ApiErrorKind = serde_json::from_str("\"network\"").unwrap();
        assert_eq!(kind, ApiErrorKind::Network);
    }
}
