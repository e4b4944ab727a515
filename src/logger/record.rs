//! Log record format.

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Record categories used across the crate.
pub mod category {
    pub const SYSTEM: &str = "system";
    pub const WEBSOCKET: &str = "websocket";
    pub const EVENT: &str = "event";
    pub const UI: &str = "ui";
    pub const ERROR: &str = "error";
}

/// One entry of the JSON event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// RFC3339 local time, second precision
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub category: String,
}

impl LogRecord {
    /// A record stamped with the current time.
    pub fn now(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            message: message.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let record = LogRecord {
            timestamp: "2024-05-01T12:00:00+09:00".to_string(),
            message: "hello".to_string(),
            category: category::SYSTEM.to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00+09:00");
    }

    #[test]
    fn test_now_is_rfc3339() {
        let record = LogRecord::now(category::EVENT, "x");
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }
}
