//! Error category classification.
//!
//! Every domain error maps to one category so the UI and the CLI can
//! decide how to present it without matching on concrete variants.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS or timeout failures.
    Network,

    /// The server answered, but with an error status.
    Server,

    /// The server sent something we could not understand.
    Protocol,

    /// Invalid input or a missing account; the user must act.
    User,

    /// Filesystem and OS errors.
    System,

    /// Missing or malformed configuration.
    Configuration,

    /// Misuse of an API by the program itself.
    Client,
}

impl ErrorCategory {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Client => "client",
        }
    }

    /// Suggested next step for the user.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and restart the stream",
            ErrorCategory::Server => "The server may be busy. Please try again later",
            ErrorCategory::Protocol => "The server may run an unsupported version",
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => {
                "Check config.toml and accounts.toml in the feedterm config directory"
            }
            ErrorCategory::Client => "This may be a bug. Please report it if it persists",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
