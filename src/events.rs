//! Events produced by the streaming session for the UI loop.

use crate::models::{FeedKind, Post};

/// Everything the session reports to its single consumer.
///
/// A closed set: the UI loop matches exhaustively, so new kinds of
/// event are added here and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// Transport is open; the subscription for `feed` is being sent.
    Connected { feed: FeedKind },
    /// The connection ended. `cause` is the server's close reason, if any.
    Disconnected { cause: Option<String> },
    /// Connecting failed, or the transport failed mid-stream.
    ConnectError { cause: String },
    PingReceived { payload: Vec<u8> },
    PongReceived { payload: Vec<u8> },
    FeedChanged { from: FeedKind, to: FeedKind },
    Post(Box<Post>),
}

impl InboundEvent {
    /// True for events after which the session emits nothing else.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InboundEvent::Disconnected { .. } | InboundEvent::ConnectError { .. }
        )
    }

    /// Short name used in log records.
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::Connected { .. } => "connected",
            InboundEvent::Disconnected { .. } => "disconnected",
            InboundEvent::ConnectError { .. } => "connect_error",
            InboundEvent::PingReceived { .. } => "ping",
            InboundEvent::PongReceived { .. } => "pong",
            InboundEvent::FeedChanged { .. } => "feed_changed",
            InboundEvent::Post(_) => "post",
        }
    }
}
