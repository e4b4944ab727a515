//! REST client error types.

use super::ErrorCategory;
use thiserror::Error;

/// Failure of a REST call against the instance API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally; no request was sent.
    #[error("post text is empty")]
    EmptyPost,

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::EmptyPost => ErrorCategory::User,
            ApiError::Status { status, .. } if *status >= 500 => ErrorCategory::Server,
            ApiError::Status { .. } => ErrorCategory::User,
            ApiError::Request { .. } | ApiError::Timeout { .. } => ErrorCategory::Network,
            ApiError::Decode(_) => ErrorCategory::Protocol,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::EmptyPost => "Nothing to post.".to_string(),
            ApiError::Status { status: 401, .. } | ApiError::Status { status: 403, .. } => {
                "The server rejected the access token.".to_string()
            }
            ApiError::Status { status, .. } => format!("The server returned HTTP {}.", status),
            ApiError::Request { .. } => "Could not reach the server.".to_string(),
            ApiError::Timeout { .. } => "The server did not respond in time.".to_string(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}

/// Classify a reqwest error that happened before a status was available.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        ApiError::Status {
            status: status.as_u16(),
            body: err.to_string(),
        }
    } else {
        ApiError::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_category() {
        let server = ApiError::Status {
            status: 503,
            body: String::new(),
        };
        let client = ApiError::Status {
            status: 400,
            body: String::new(),
        };
        assert_eq!(server.category(), ErrorCategory::Server);
        assert_eq!(client.category(), ErrorCategory::User);
    }

    #[test]
    fn test_auth_status_message() {
        let err = ApiError::Status {
            status: 401,
            body: "{}".to_string(),
        };
        assert_eq!(err.user_message(), "The server rejected the access token.");
    }
}
