//! Streaming-related error types.
//!
//! Errors raised while resolving the stream endpoint, talking to the
//! transport, decoding inbound frames and driving the session.

use super::ErrorCategory;
use thiserror::Error;

/// The instance configuration cannot be turned into a stream endpoint.
///
/// Fatal to session start: no session is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("access token is empty")]
    MissingToken,

    #[error("invalid base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported url scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("base url '{url}' has no host")]
    MissingHost { url: String },
}

impl ResolveError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }

    pub fn user_message(&self) -> String {
        match self {
            ResolveError::MissingToken => {
                "The account has no access token. Re-add it with `feedterm accounts add`.".to_string()
            }
            ResolveError::InvalidUrl { url, .. } | ResolveError::MissingHost { url } => {
                format!("The account's server address '{}' is not a valid URL.", url)
            }
            ResolveError::UnsupportedScheme { scheme } => {
                format!("Server addresses must start with http:// or https:// (got {}://).", scheme)
            }
        }
    }
}

/// Transport-level failure on the stream connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("connect timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),

    /// The connection is already closed; sends and reads are refused.
    #[error("connection closed")]
    Closed,
}

impl TransportError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Network
    }

    pub fn user_message(&self) -> String {
        match self {
            TransportError::Connect(cause) => format!("Could not connect to the server: {}", cause),
            TransportError::Timeout { secs } => {
                format!("The server did not answer within {} seconds.", secs)
            }
            TransportError::Send(_) | TransportError::Receive(_) => {
                "The connection to the server failed.".to_string()
            }
            TransportError::Closed => "The connection was closed.".to_string(),
        }
    }
}

/// An inbound frame that is not a post notification.
///
/// Never fatal: the frame is logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unrecognized message '{kind}'")]
    Unrecognized { kind: String },

    #[error("invalid post body: {0}")]
    InvalidPost(String),
}

impl DecodeError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Protocol
    }
}

/// Misuse of the session lifecycle, or a failed command send.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session already started")]
    AlreadyStarted,

    #[error("session is closed")]
    Closed,

    #[error("session is not connected")]
    NotConnected,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SessionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::AlreadyStarted | SessionError::Closed | SessionError::NotConnected => {
                ErrorCategory::Client
            }
            SessionError::Transport(e) => e.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_messages() {
        let err = ResolveError::UnsupportedScheme {
            scheme: "ftp".to_string(),
        };
        assert!(err.to_string().contains("ftp"));
        assert!(err.user_message().contains("ftp://"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_transport_error_is_retryable_category() {
        let err = TransportError::Timeout { secs: 10 };
        assert!(err.category().is_retryable());
        assert!(err.user_message().contains("10 seconds"));
    }

    #[test]
    fn test_session_error_from_transport() {
        let err: SessionError = TransportError::Closed.into();
        assert_eq!(err, SessionError::Transport(TransportError::Closed));
        assert_eq!(err.to_string(), "connection closed");
        assert_eq!(SessionError::AlreadyStarted.category(), ErrorCategory::Client);
    }
}
