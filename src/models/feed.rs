//! Feed (timeline channel) selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A timeline the server multiplexes over the streaming connection.
///
/// Exactly one feed is current per session. New feeds are added by
/// extending this enum; the wire name mapping below is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Posts from accounts the user follows
    #[default]
    Home,
    /// Posts from every local account on the instance
    Local,
}

impl FeedKind {
    /// Channel name used in `connect` envelopes.
    pub fn wire_name(&self) -> &'static str {
        match self {
            FeedKind::Home => "homeTimeline",
            FeedKind::Local => "localTimeline",
        }
    }

    /// Reverse of [`FeedKind::wire_name`].
    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "homeTimeline" => Some(FeedKind::Home),
            "localTimeline" => Some(FeedKind::Local),
            _ => None,
        }
    }

    /// The feed a toggle switches to (Home <-> Local).
    pub fn toggled(&self) -> Self {
        match self {
            FeedKind::Home => FeedKind::Local,
            FeedKind::Local => FeedKind::Home,
        }
    }

    /// Short label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            FeedKind::Home => "Home",
            FeedKind::Local => "Local",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "hometimeline" => Ok(FeedKind::Home),
            "local" | "localtimeline" => Ok(FeedKind::Local),
            other => Err(format!("unknown feed '{}' (expected 'home' or 'local')", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(FeedKind::Home.wire_name(), "homeTimeline");
        assert_eq!(FeedKind::Local.wire_name(), "localTimeline");
        assert_eq!(FeedKind::from_wire_name("localTimeline"), Some(FeedKind::Local));
        assert_eq!(FeedKind::from_wire_name("main"), None);
    }

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(FeedKind::Home.toggled(), FeedKind::Local);
        assert_eq!(FeedKind::Local.toggled(), FeedKind::Home);
        assert_eq!(FeedKind::Home.toggled().toggled(), FeedKind::Home);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("home".parse::<FeedKind>(), Ok(FeedKind::Home));
        assert_eq!(" Local ".parse::<FeedKind>(), Ok(FeedKind::Local));
        assert!("global".parse::<FeedKind>().is_err());
    }

    #[test]
    fn test_default_is_home() {
        assert_eq!(FeedKind::default(), FeedKind::Home);
    }
}
