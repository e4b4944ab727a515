//! Tungstenite-based stream transport.
//!
//! Opens a websocket with `connect_async`, splits it, and exposes the two
//! halves through [`FrameSink`] and [`FrameStream`].

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::TransportError;
use crate::traits::{Frame, FrameSink, FrameStream, TransportConnector};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production connector.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransportConnector for TungsteniteConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>), TransportError> {
        let (ws_stream, response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        debug!(status = %response.status(), "websocket handshake complete");

        let (sink, stream) = ws_stream.split();
        Ok((
            Box::new(TungsteniteSink { sink }),
            Box::new(TungsteniteStream { stream }),
        ))
    }
}

struct TungsteniteSink {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for TungsteniteSink {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        self.sink
            .send(to_message(frame))
            .await
            .map_err(|e| map_error(e, TransportError::Send))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.sink.close().await {
            Ok(()) => Ok(()),
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(TransportError::Send(e.to_string())),
        }
    }
}

struct TungsteniteStream {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl FrameStream for TungsteniteStream {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        loop {
            match self.stream.next().await? {
                Ok(message) => {
                    if let Some(frame) = from_message(message) {
                        return Some(Ok(frame));
                    }
                }
                Err(e) => return Some(Err(map_error(e, TransportError::Receive))),
            }
        }
    }
}

fn to_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text),
        Frame::Binary(data) => Message::Binary(data),
        Frame::Ping(data) => Message::Ping(data),
        Frame::Pong(data) => Message::Pong(data),
        Frame::Close(reason) => Message::Close(reason.map(|reason| {
            tungstenite::protocol::CloseFrame {
                code: tungstenite::protocol::frame::coding::CloseCode::Normal,
                reason: reason.into(),
            }
        })),
    }
}

/// Raw frames are an implementation detail of tungstenite and are skipped.
fn from_message(message: Message) -> Option<Frame> {
    match message {
        Message::Text(text) => Some(Frame::Text(text)),
        Message::Binary(data) => Some(Frame::Binary(data)),
        Message::Ping(data) => Some(Frame::Ping(data)),
        Message::Pong(data) => Some(Frame::Pong(data)),
        Message::Close(frame) => Some(Frame::Close(
            frame
                .map(|f| f.reason.to_string())
                .filter(|reason| !reason.is_empty()),
        )),
        Message::Frame(_) => None,
    }
}

fn map_error(err: tungstenite::Error, wrap: fn(String) -> TransportError) -> TransportError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::Closed
        }
        other => wrap(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_reason_mapping() {
        let message = to_message(Frame::Close(Some("bye".to_string())));
        assert_eq!(from_message(message), Some(Frame::Close(Some("bye".to_string()))));
        assert_eq!(
            from_message(Message::Close(None)),
            Some(Frame::Close(None))
        );
    }

    #[test]
    fn test_text_and_ping_mapping() {
        assert_eq!(
            from_message(to_message(Frame::Text("{}".to_string()))),
            Some(Frame::Text("{}".to_string()))
        );
        assert_eq!(
            from_message(to_message(Frame::Ping(vec![1, 2]))),
            Some(Frame::Ping(vec![1, 2]))
        );
    }

    #[test]
    fn test_closed_errors_map_to_closed() {
        assert_eq!(
            map_error(tungstenite::Error::AlreadyClosed, TransportError::Send),
            TransportError::Closed
        );
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let connector = TungsteniteConnector::new();
        let result = connector.connect("ws://127.0.0.1:1/streaming").await;
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
