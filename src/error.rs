//! Error types for the SysAid client.
//!
//! This module defines `SysaidError`, the unified error type used throughout
//! the crate for consistent error handling and propagation.
//!
//! # Security
//!
//! Error messages built from response bodies are sanitized so the account
//! password is never leaked in logs or error responses. Use
//! `sanitize_message()` when constructing error messages from external
//! sources.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Maximum length for HTTP error response bodies carried in errors.
pub(crate) const MAX_ERROR_BODY_LEN: usize = 500;

/// Unified error type for all SysAid client operations.
///
/// Each variant provides specific context about the failure, enabling
/// meaningful error messages without leaking credentials.
#[derive(Error, Debug)]
pub enum SysaidError {
    /// Configuration error - missing or invalid construction parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// Login was rejected by the remote service.
    ///
    /// Covers bad credentials, an unknown environment, the server-side
    /// login rate limit (two attempts per five minutes per account), and
    /// a session rejected during re-login. Terminal: the client never
    /// retries a failed login on its own.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Details about why the login was rejected.
        message: String,
    },

    /// The remote service answered with a non-success status.
    ///
    /// The client does not reinterpret status codes; callers decide what
    /// a 404 on `sr/{id}` means for their domain.
    #[error("SysAid API returned HTTP {status}: {body}")]
    Remote {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, truncated and sanitized.
        body: String,
    },

    /// HTTP request failed during transmission.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {duration:?} - the server may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing the cookie file failed.
    #[error("session store error at {path}: {source}")]
    SessionStore {
        /// The cookie file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl SysaidError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        SysaidError::Config(message.into())
    }

    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        SysaidError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        SysaidError::Authentication {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SysaidError::Validation(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        SysaidError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a session store error.
    pub fn session_store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SysaidError::SessionStore {
            path: path.into(),
            source,
        }
    }

    /// Creates a remote error from a status and raw body.
    ///
    /// The body is truncated to avoid carrying verbose server internals.
    pub fn remote(status: reqwest::StatusCode, body: &str) -> Self {
        SysaidError::Remote {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// Returns true if this error indicates a rejected login or session.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, SysaidError::Authentication { .. })
    }

    /// Truncates a response body carried in an error message.
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LEN {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...[truncated]", &body[..end])
        }
    }

    /// Sanitizes an error message to remove any occurrence of the password.
    ///
    /// Credentials must never appear in logs, error messages, or responses
    /// surfaced to callers.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `password` - The password to strip from the message
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the password replaced with
    /// `[REDACTED]`.
    #[must_use]
    pub fn sanitize_message(message: &str, password: &str) -> String {
        if password.is_empty() {
            return message.to_string();
        }
        message.replace(password, "[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = SysaidError::missing_env("SYSAID_USERNAME");
        assert!(err.to_string().contains("SYSAID_USERNAME"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validation_error() {
        let err = SysaidError::validation("solution must not be empty");
        assert_eq!(
            err.to_string(),
            "validation error: solution must not be empty"
        );
    }

    #[test]
    fn test_authentication_error() {
        let err = SysaidError::authentication("login rejected (HTTP 401)");
        assert!(err.is_authentication());
        assert!(err.to_string().contains("authentication failed"));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_remote_error_truncates_body() {
        let body = "x".repeat(2000);
        let err = SysaidError::remote(reqwest::StatusCode::BAD_REQUEST, &body);
        match err {
            SysaidError::Remote { status, body } => {
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert!(body.len() < 600);
                assert!(body.ends_with("...[truncated]"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_remote_error_keeps_short_body() {
        let err = SysaidError::remote(reqwest::StatusCode::NOT_FOUND, "no such SR");
        assert!(err.to_string().contains("no such SR"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // Multi-byte characters straddling the cut must not panic.
        let body = "æ".repeat(MAX_ERROR_BODY_LEN);
        let truncated = SysaidError::truncate_body(&body);
        assert!(truncated.ends_with("...[truncated]"));
    }

    #[test]
    fn test_timeout_error() {
        let err = SysaidError::timeout(Duration::from_secs(30), "GET sr/1");
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn test_sanitize_message_removes_password() {
        let password = "hunter2hunter2";
        let message = format!("login failed for payload password={}", password);
        let sanitized = SysaidError::sanitize_message(&message, password);
        assert!(!sanitized.contains(password));
        assert!(sanitized.contains("[REDACTED]"));
    }

    #[test]
    fn test_sanitize_message_empty_password() {
        let message = "some error message";
        let sanitized = SysaidError::sanitize_message(message, "");
        assert_eq!(sanitized, message);
    }

    #[test]
    fn test_sanitize_message_no_match() {
        let message = "some error message";
        let sanitized = SysaidError::sanitize_message(message, "not_present");
        assert_eq!(sanitized, message);
    }

    #[test]
    fn test_session_store_error_names_path() {
        let err = SysaidError::session_store(
            "/tmp/alice_cookies.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("alice_cookies.json"));
        assert!(msg.contains("denied"));
    }
}
