//! Error types and handling for negotiate-http
//!
//! Provides structured error types for every adapter operation. Transport and
//! decode failures keep their original error as the source so callers can
//! inspect the underlying engine's diagnosis.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::client::HttpMethod;

/// Result type alias for negotiate-http operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error types for the content-negotiated HTTP adapter
#[derive(Error, Debug)]
pub enum ClientError {
    // ═══════════════════════════════════════════════════════════════
    // Session Lifecycle & Call Preconditions
    // ═══════════════════════════════════════════════════════════════
    /// A request was issued before `open()` (or after `close()`)
    #[error("Session not started: call open() before issuing requests")]
    NotInitialized,

    /// The requested method is outside the configured whitelist
    #[error("Method {method} is not allowed (allowed: {allowed})")]
    InvalidMethod {
        method: HttpMethod,
        allowed: AllowedMethods,
    },

    /// The request could not be assembled (bad header, unreadable file, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ═══════════════════════════════════════════════════════════════
    // Exchange Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failure raised by the HTTP engine, passed through unchanged
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body declared as JSON could not be parsed
    #[error("Failed to decode JSON response body: {0}")]
    Decode(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file not found
    #[error("Configuration not found")]
    NoConfig,

    // ═══════════════════════════════════════════════════════════════
    // Other Errors
    // ═══════════════════════════════════════════════════════════════
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Get the process exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidMethod { .. } | Self::InvalidRequest(_) => 2,
            Self::ConfigRead { .. } | Self::InvalidConfig(_) | Self::NoConfig => 3,
            Self::Transport(_) => 4,
            Self::Decode(_) => 5,
            Self::NotInitialized | Self::Internal(_) => 1,
        }
    }

    /// Whether the error came out of the HTTP engine
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Allowed method set carried by [`ClientError::InvalidMethod`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods(pub Vec<HttpMethod>);

impl AllowedMethods {
    /// Whether `method` is part of the set
    #[must_use]
    pub fn contains(&self, method: HttpMethod) -> bool {
        self.0.contains(&method)
    }
}

impl fmt::Display for AllowedMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|m| m.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_method_message_names_allowed_set() {
        let err = ClientError::InvalidMethod {
            method: HttpMethod::Delete,
            allowed: AllowedMethods(vec![HttpMethod::Get, HttpMethod::Post]),
        };
        assert_eq!(
            err.to_string(),
            "Method DELETE is not allowed (allowed: GET, POST)"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ClientError::NotInitialized.exit_code(), 1);
        assert_eq!(ClientError::NoConfig.exit_code(), 3);
        assert!(!ClientError::NotInitialized.is_transport());
    }

    #[test]
    fn test_decode_from_serde() {
        let err: ClientError = serde_json::from_str::<serde_json::Value>("{")
            .map_err(ClientError::from)
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert_eq!(err.exit_code(), 5);
    }
}
