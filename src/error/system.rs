//! Configuration, account store and log file error types.

use super::ErrorCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Failure loading or validating `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("could not read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("could not parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("could not determine the configuration directory")]
    NoConfigDirectory,
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::Io { .. } => ErrorCategory::System,
            _ => ErrorCategory::Configuration,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io { path, .. } => format!("Could not read '{}'.", path.display()),
            ConfigError::Parse { path, message } => {
                format!("'{}' is not valid TOML: {}", path.display(), message)
            }
            ConfigError::Invalid { field, reason } => format!("Config value {} {}.", field, reason),
            ConfigError::NoConfigDirectory => {
                "Could not determine your configuration directory. Set FEEDTERM_CONFIG.".to_string()
            }
        }
    }
}

/// Failure in the account store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("no account named '{key}'")]
    NotFound { key: String },

    #[error("an account named '{key}' already exists")]
    AlreadyExists { key: String },

    #[error("invalid account: {field} {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("could not access {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("could not parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("could not determine the configuration directory")]
    NoConfigDirectory,
}

impl AccountError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AccountError::NotFound { .. }
            | AccountError::AlreadyExists { .. }
            | AccountError::Invalid { .. } => ErrorCategory::User,
            AccountError::Io { .. } => ErrorCategory::System,
            AccountError::Parse { .. } | AccountError::NoConfigDirectory => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AccountError::NotFound { key } => format!(
                "No account named '{}'. Run `feedterm accounts list` to see configured accounts.",
                key
            ),
            AccountError::AlreadyExists { key } => format!(
                "An account named '{}' already exists. Remove it first with `feedterm accounts remove {}`.",
                key, key
            ),
            other => other.to_string(),
        }
    }
}

/// A failed log file operation. Reported on the tracing side channel only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("log {operation} failed for {}: {message}", path.display())]
pub struct LogIoError {
    pub operation: &'static str,
    pub path: PathBuf,
    pub message: String,
}

impl LogIoError {
    pub fn new(operation: &'static str, path: impl Into<PathBuf>, err: impl ToString) -> Self {
        Self {
            operation,
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_not_found_message() {
        let err = AccountError::NotFound {
            key: "work".to_string(),
        };
        assert!(err.user_message().contains("accounts list"));
        assert_eq!(err.category(), ErrorCategory::User);
    }

    #[test]
    fn test_log_io_error_display() {
        let err = LogIoError::new("rename", "/tmp/log.json", "denied");
        assert_eq!(err.to_string(), "log rename failed for /tmp/log.json: denied");
    }
}
