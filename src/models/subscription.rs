//! Channel subscriptions held by a streaming session.

use super::FeedKind;
use std::fmt;
use uuid::Uuid;

/// Opaque channel id sent with `connect`/`disconnect` envelopes.
///
/// Freshly generated for every subscribe; the server echoes it back on
/// every post it delivers for that channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Whether a channel id received on the wire refers to this subscription.
    pub fn matches(&self, wire_id: &str) -> bool {
        Uuid::parse_str(wire_id).map(|id| id == self.0).unwrap_or(false)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// "Receiving frames for channel `feed` under `id`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub feed: FeedKind,
    pub id: SubscriptionId,
}

impl Subscription {
    pub fn new(feed: FeedKind) -> Self {
        Self {
            feed,
            id: SubscriptionId::generate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = SubscriptionId::generate();
        let b = SubscriptionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_wire_form() {
        let id = SubscriptionId::generate();
        assert!(id.matches(&id.to_string()));
        assert!(id.matches(&id.to_string().to_uppercase()));
        assert!(!id.matches("not-a-uuid"));
        assert!(!id.matches(&SubscriptionId::generate().to_string()));
    }
}
