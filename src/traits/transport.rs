//! Stream transport trait abstraction.
//!
//! The session talks to the server through these traits so the receive
//! loop can be driven by scripted frames in tests.

use async_trait::async_trait;

use crate::error::TransportError;

/// One transport-level message, independent of the websocket library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    /// Close frame with the peer's reason, if it gave one
    Close(Option<String>),
}

/// Write half of an open connection.
#[async_trait]
pub trait FrameSink: Send {
    /// Send one frame. Does not wait for any acknowledgement from the peer.
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Send a close frame and flush. Further sends fail with
    /// [`TransportError::Closed`].
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Read half of an open connection.
#[async_trait]
pub trait FrameStream: Send {
    /// Next inbound frame, or `None` once the peer has gone away.
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>>;
}

/// Opens connections.
///
/// # Example
///
/// ```ignore
/// let (mut sink, mut stream) = connector.connect("wss://host/streaming?i=t").await?;
/// sink.send(Frame::Text(encode_subscribe(FeedKind::Home, &id))).await?;
/// while let Some(frame) = stream.next_frame().await { /* ... */ }
/// ```
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>), TransportError>;
}
