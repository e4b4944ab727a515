//! Post payloads delivered over the stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server-assigned post identifier.
pub type PostId = String;

/// Author of a post.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub username: String,
    /// Remote host for federated accounts, `None` for local ones
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_cat: bool,
}

impl PostUser {
    /// Display name, falling back to the username when unset or blank.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// `@user` for local accounts, `@user@host` for remote ones.
    pub fn handle(&self) -> String {
        match &self.host {
            Some(host) => format!("@{}@{}", self.username, host),
            None => format!("@{}", self.username),
        }
    }
}

/// A unit of user content. A renote wraps the reshared post in `renote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: String,
    pub user: PostUser,
    #[serde(default)]
    pub text: Option<String>,
    /// Content warning shown in place of the text
    #[serde(default)]
    pub cw: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub reply_id: Option<String>,
    #[serde(default)]
    pub renote_id: Option<String>,
    #[serde(default)]
    pub renote: Option<Box<Post>>,
    #[serde(default)]
    pub renote_count: u64,
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub reactions: BTreeMap<String, u64>,
}

impl Post {
    /// True when this post reshares another one.
    pub fn is_renote(&self) -> bool {
        self.renote.is_some()
    }

    /// Body text, empty when the post has none (pure renotes, file-only posts).
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn total_reactions(&self) -> u64 {
        self.reactions.values().sum()
    }
}
