//! Mock stream transport for testing.
//!
//! Inbound frames are scripted by the test; outbound frames are recorded
//! so tests can assert on exactly what the session wrote.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::traits::{Frame, FrameSink, FrameStream, TransportConnector};

/// `None` marks the end of the inbound stream.
type Scripted = Option<Result<Frame, TransportError>>;

/// Mock connector handing out one scripted connection.
///
/// Clones share state, so a test keeps one handle while the session owns
/// another.
///
/// # Example
///
/// ```ignore
/// let connector = MockConnector::new();
/// connector.push_frame(Frame::Ping(vec![1]));
/// // ... run the session ...
/// assert_eq!(connector.sent_frames().last(), Some(&Frame::Pong(vec![1])));
/// ```
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<MockState>,
}

struct MockState {
    inbound_tx: mpsc::UnboundedSender<Scripted>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<Scripted>>>,
    sent: Mutex<Vec<Frame>>,
    sent_tx: mpsc::UnboundedSender<Frame>,
    sent_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Frame>>,
    connect_error: Mutex<Option<TransportError>>,
    hang_on_connect: AtomicBool,
    send_should_fail: AtomicBool,
    closed: AtomicBool,
    urls: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(MockState {
                inbound_tx,
                inbound_rx: Mutex::new(Some(inbound_rx)),
                sent: Mutex::new(Vec::new()),
                sent_tx,
                sent_rx: tokio::sync::Mutex::new(sent_rx),
                connect_error: Mutex::new(None),
                hang_on_connect: AtomicBool::new(false),
                send_should_fail: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                urls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A connector whose `connect` fails with `err`.
    pub fn failing(err: TransportError) -> Self {
        let connector = Self::new();
        *lock(&connector.state.connect_error) = Some(err);
        connector
    }

    /// A connector whose `connect` never completes.
    pub fn hanging() -> Self {
        let connector = Self::new();
        connector.state.hang_on_connect.store(true, Ordering::SeqCst);
        connector
    }

    /// Queue an inbound frame.
    pub fn push_frame(&self, frame: Frame) {
        let _ = self.state.inbound_tx.send(Some(Ok(frame)));
    }

    /// Queue an inbound text frame.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_frame(Frame::Text(text.into()));
    }

    /// Queue a transport read error.
    pub fn push_error(&self, err: TransportError) {
        let _ = self.state.inbound_tx.send(Some(Err(err)));
    }

    /// End the inbound stream without a close frame.
    pub fn end_stream(&self) {
        let _ = self.state.inbound_tx.send(None);
    }

    /// Make every subsequent send fail.
    pub fn set_send_should_fail(&self, should_fail: bool) {
        self.state
            .send_should_fail
            .store(should_fail, Ordering::SeqCst);
    }

    /// Every frame the client has sent so far.
    pub fn sent_frames(&self) -> Vec<Frame> {
        lock(&self.state.sent).clone()
    }

    /// Sent text frames parsed as JSON; non-JSON frames are skipped.
    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent_frames()
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Text(text) => serde_json::from_str(&text).ok(),
                _ => None,
            })
            .collect()
    }

    /// Wait for the next frame the client sends.
    pub async fn next_sent(&self) -> Option<Frame> {
        self.state.sent_rx.lock().await.recv().await
    }

    /// URLs passed to `connect`.
    pub fn connected_urls(&self) -> Vec<String> {
        lock(&self.state.urls).clone()
    }

    /// Whether the client closed its write half.
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportConnector for MockConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>), TransportError> {
        lock(&self.state.urls).push(url.to_string());

        if self.state.hang_on_connect.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let connect_error = lock(&self.state.connect_error).clone();
        if let Some(err) = connect_error {
            return Err(err);
        }

        let inbound = lock(&self.state.inbound_rx)
            .take()
            .ok_or_else(|| TransportError::Connect("mock connection already used".to_string()))?;

        Ok((
            Box::new(MockSink {
                state: self.state.clone(),
            }),
            Box::new(MockStream {
                inbound,
                ended: false,
            }),
        ))
    }
}

struct MockSink {
    state: Arc<MockState>,
}

#[async_trait]
impl FrameSink for MockSink {
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        if self.state.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        if self.state.send_should_fail.load(Ordering::SeqCst) {
            return Err(TransportError::Send("mock send failure".to_string()));
        }
        lock(&self.state.sent).push(frame.clone());
        let _ = self.state.sent_tx.send(frame);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MockStream {
    inbound: mpsc::UnboundedReceiver<Scripted>,
    ended: bool,
}

#[async_trait]
impl FrameStream for MockStream {
    async fn next_frame(&mut self) -> Option<Result<Frame, TransportError>> {
        if self.ended {
            return None;
        }
        match self.inbound.recv().await {
            Some(Some(result)) => Some(result),
            Some(None) | None => {
                self.ended = true;
                None
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
