//! Common test utilities for integration tests.
//!
//! Builds sessions over a [`MockConnector`] and waits for bus events and
//! sent frames with a timeout, so a hung session fails the test instead of
//! stalling it.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use feedterm::adapters::MockConnector;
use feedterm::bus::{EventBus, EventReceiver};
use feedterm::config::StreamConfig;
use feedterm::error::SessionError;
use feedterm::events::InboundEvent;
use feedterm::logger::RotatingLogger;
use feedterm::models::Instance;
use feedterm::traits::Frame;
use feedterm::websocket::StreamingSession;
use tokio::task::JoinHandle;

/// Upper bound for any single wait in a test.
pub const WAIT: Duration = Duration::from_secs(5);

pub fn test_instance() -> Instance {
    Instance::new("https://misskey.example", "alice", "test-token")
}

/// A started session plus the handles a test needs to drive it.
pub struct Harness {
    pub session: StreamingSession,
    pub events: EventReceiver,
    pub connector: MockConnector,
    pub task: JoinHandle<Result<(), SessionError>>,
}

pub fn start_session(connector: MockConnector) -> Harness {
    start_session_with(
        connector,
        StreamConfig::default(),
        Arc::new(RotatingLogger::disabled()),
    )
}

pub fn start_session_with(
    connector: MockConnector,
    config: StreamConfig,
    logger: Arc<RotatingLogger>,
) -> Harness {
    let (tx, events) = EventBus::channel(config.event_buffer);
    let session = StreamingSession::new(
        &test_instance(),
        &config,
        Arc::new(connector.clone()),
        logger,
        tx,
    )
    .expect("session");
    let task = tokio::spawn({
        let session = session.clone();
        async move { session.start().await }
    });
    Harness {
        session,
        events,
        connector,
        task,
    }
}

/// Next event on the bus; panics on timeout or a closed bus.
pub async fn next_event(events: &mut EventReceiver) -> InboundEvent {
    tokio::time::timeout(WAIT, events.receive())
        .await
        .expect("timed out waiting for an event")
        .expect("event bus closed")
}

/// Next frame the session sent.
pub async fn next_sent(connector: &MockConnector) -> Frame {
    tokio::time::timeout(WAIT, connector.next_sent())
        .await
        .expect("timed out waiting for a sent frame")
        .expect("sent frame channel closed")
}

/// Next frame the session sent, which must be a JSON text frame.
pub async fn next_sent_json(connector: &MockConnector) -> serde_json::Value {
    match next_sent(connector).await {
        Frame::Text(text) => serde_json::from_str(&text).expect("sent frame is JSON"),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

/// The subscription id carried by a connect/disconnect envelope.
pub fn envelope_id(envelope: &serde_json::Value) -> String {
    envelope["body"]["id"]
        .as_str()
        .expect("envelope has body.id")
        .to_string()
}

/// An inbound post notification for `channel_id`.
pub fn note_frame(channel_id: &str, post_id: &str) -> String {
    serde_json::json!({
        "type": "channel",
        "body": {
            "id": channel_id,
            "type": "note",
            "body": {
                "id": post_id,
                "createdAt": "2024-05-01T12:00:00.000Z",
                "userId": "u1",
                "user": {"id": "u1", "name": "Bob", "username": "bob"},
                "text": format!("post {}", post_id)
            }
        }
    })
    .to_string()
}

/// Wait for `Connected` and the initial subscribe frame; returns the
/// subscription id.
pub async fn connect_and_subscribe(harness: &mut Harness) -> String {
    let connected = next_event(&mut harness.events).await;
    assert!(
        matches!(connected, InboundEvent::Connected { .. }),
        "expected Connected, got {:?}",
        connected
    );
    let subscribe = next_sent_json(&harness.connector).await;
    assert_eq!(subscribe["type"], "connect");
    envelope_id(&subscribe)
}

/// Wait for the session task to finish.
pub async fn join(task: JoinHandle<Result<(), SessionError>>) -> Result<(), SessionError> {
    tokio::time::timeout(WAIT, task)
        .await
        .expect("session did not finish")
        .expect("session task panicked")
}
