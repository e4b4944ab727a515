//! Connection parameters for one server account.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account on a server: where to connect and how to authenticate.
///
/// Immutable for the lifetime of a session. The access token is never
/// printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "baseurl")]
    pub base_url: String,
    pub username: String,
    #[serde(rename = "token")]
    pub access_token: String,
}

impl Instance {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            access_token: access_token.into(),
        }
    }

    /// Base URL without a trailing slash, for joining REST paths.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let instance = Instance::new("https://misskey.example", "alice", "secret-token");
        let debug = format!("{:?}", instance);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_api_root_trims_slash() {
        let instance = Instance::new("https://misskey.example/api/", "a", "t");
        assert_eq!(instance.api_root(), "https://misskey.example/api");
    }

    #[test]
    fn test_toml_keys() {
        let instance: Instance = toml::from_str(
            "baseurl = \"https://x.example/api\"\nusername = \"bob\"\ntoken = \"abc\"\n",
        )
        .unwrap();
        assert_eq!(instance.base_url, "https://x.example/api");
        assert_eq!(instance.access_token, "abc");
    }
}
