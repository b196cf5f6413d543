//! Error types for the Megaplan client.
//!
//! This module defines `MegaplanError`, the unified error type used throughout
//! the library. Programmer-misuse failures (`NotAuthenticated`, `Validation`,
//! `UnknownShortcut`, `Config`) are returned synchronously while building a
//! request; everything that happens on the wire is returned from
//! [`Request::send`](crate::request::Request::send).
//!
//! # Security
//!
//! The secret key must never appear in logs. Use `sanitize_message()` when
//! logging error messages that may have picked up request details.

use thiserror::Error;

/// Stable symbolic codes for transport and protocol failures.
pub mod codes {
    /// Connection closed before the response body was complete.
    pub const HANGUP: &str = ":hangup";
    /// Response body is not valid JSON, or lacks the requested key.
    pub const INVALID_JSON: &str = ":invalidjson";
    /// Request could not be delivered.
    pub const NETWORK: &str = ":network";
    /// Status code of a successful Megaplan envelope.
    pub const OK: &str = "ok";
}

/// Unified error type for all Megaplan operations.
#[derive(Error, Debug)]
pub enum MegaplanError {
    /// Configuration error - missing hostname or invalid environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A signed call was attempted before credentials were obtained.
    #[error("authenticate first")]
    NotAuthenticated,

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The URI starts with a shortcut prefix that is not in the table.
    #[error("unknown URI shortcut: {0}")]
    UnknownShortcut(String),

    /// The HMAC could not be initialized with the secret key.
    #[error("failed to sign request: {0}")]
    Signature(String),

    /// Megaplan answered with a status code other than `ok`.
    ///
    /// `status` is the envelope's status object exactly as received.
    #[error("Megaplan API error {}: {}", status_field(.status, "code"), status_field(.status, "message"))]
    Remote {
        /// The original `status` object of the response envelope.
        status: serde_json::Value,
    },

    /// The response body could not be parsed as JSON.
    #[error("received invalid json string: {source}")]
    InvalidJson {
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A response key requested through a pluck filter is absent.
    #[error("key {key} not exists in json")]
    MissingKey {
        /// The snake_case key that was requested.
        key: String,
    },

    /// The connection closed before the body was fully received.
    #[error("connection closed unexpectedly after {} chunk(s)", chunk_count(.chunks))]
    Hangup {
        /// Body chunks received before the connection dropped.
        chunks: Vec<String>,
        /// The transport error that ended the body.
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be delivered (DNS, refused, reset).
    #[error("request dropped: {0}")]
    Network(#[source] reqwest::Error),

    /// A parameter value could not be serialized, or a typed view of the
    /// response could not be deserialized.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn status_field<'a>(status: &'a serde_json::Value, field: &str) -> &'a str {
    status.get(field).and_then(|v| v.as_str()).unwrap_or("-")
}

fn chunk_count(chunks: &[String]) -> usize {
    chunks.len()
}

impl MegaplanError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        MegaplanError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        MegaplanError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        MegaplanError::Validation(message.into())
    }

    /// Creates a remote error from the envelope's status object.
    pub fn remote(status: serde_json::Value) -> Self {
        MegaplanError::Remote { status }
    }

    /// Returns the symbolic code for transport and protocol failures.
    ///
    /// Remote rejections return the vendor's own status code; usage and
    /// configuration errors have no code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            MegaplanError::Hangup { .. } => Some(codes::HANGUP),
            MegaplanError::InvalidJson { .. } | MegaplanError::MissingKey { .. } => {
                Some(codes::INVALID_JSON)
            }
            MegaplanError::Network(_) => Some(codes::NETWORK),
            MegaplanError::Remote { status } => status.get("code").and_then(|c| c.as_str()),
            _ => None,
        }
    }

    /// Returns the human-readable text for a symbolic code.
    #[must_use]
    pub fn message_for(code: &str) -> Option<&'static str> {
        crate::dicts::REQUEST_ERRORS
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, message)| *message)
    }

    /// Returns true if the error was raised before any network I/O.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            MegaplanError::NotAuthenticated
                | MegaplanError::Validation(_)
                | MegaplanError::UnknownShortcut(_)
                | MegaplanError::Config(_)
        )
    }

    /// Sanitizes an error message to remove any occurrence of the secret key.
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the key replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, secret: &str) -> String {
        Self::sanitize_message(&self.to_string(), secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = MegaplanError::missing_env("MEGAPLAN_HOST");
        assert!(err.to_string().contains("MEGAPLAN_HOST"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validation_error() {
        let err = MegaplanError::validation("comment text is required");
        assert_eq!(
            err.to_string(),
            "validation error: comment text is required"
        );
        assert!(err.is_usage());
    }

    #[test]
    fn test_not_authenticated_message() {
        let err = MegaplanError::NotAuthenticated;
        assert_eq!(err.to_string(), "authenticate first");
        assert!(err.is_usage());
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_remote_error_keeps_status() {
        let status = serde_json::json!({"code": "error", "message": "Access denied"});
        let err = MegaplanError::remote(status.clone());
        assert_eq!(err.code(), Some("error"));
        assert!(err.to_string().contains("Access denied"));
        match err {
            MegaplanError::Remote { status: kept } => assert_eq!(kept, status),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_code() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = MegaplanError::InvalidJson { source };
        assert_eq!(err.code(), Some(codes::INVALID_JSON));
        assert!(!err.is_usage());
    }

    #[test]
    fn test_missing_key_shares_invalid_json_code() {
        let err = MegaplanError::MissingKey {
            key: "tasks".to_string(),
        };
        assert_eq!(err.code(), Some(codes::INVALID_JSON));
        assert_eq!(err.to_string(), "key tasks not exists in json");
    }

    #[test]
    fn test_message_for_codes() {
        assert_eq!(
            MegaplanError::message_for(codes::HANGUP),
            Some("connection closed unexpectedly")
        );
        assert_eq!(
            MegaplanError::message_for(codes::INVALID_JSON),
            Some("received invalid json string")
        );
        assert_eq!(
            MegaplanError::message_for(codes::NETWORK),
            Some("request dropped")
        );
        assert_eq!(MegaplanError::message_for(":other"), None);
    }

    #[test]
    fn test_sanitize_message_removes_secret() {
        let secret = "s3cr3t_k3y";
        let message = format!("signing with {} failed", secret);
        let sanitized = MegaplanError::sanitize_message(&message, secret);
        assert!(!sanitized.contains(secret));
        assert!(sanitized.contains("[REDACTED]"));
    }

    #[test]
    fn test_sanitize_message_empty_secret() {
        let message = "Some error message";
        assert_eq!(MegaplanError::sanitize_message(message, ""), message);
    }
}
