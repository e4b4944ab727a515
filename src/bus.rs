//! Bounded, ordered delivery of session events to the UI loop.
//!
//! One producer (the session's receive loop) and one consumer (the UI
//! loop). When the queue is full the producer waits, which throttles the
//! stream against a stalled UI instead of dropping events.

use crate::events::InboundEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Queue capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 100;

/// The consumer side was dropped; the event was not delivered.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("event bus closed")]
pub struct BusClosed(pub InboundEvent);

pub struct EventBus;

impl EventBus {
    /// Create a bus with room for `capacity` undelivered events (at least 1).
    pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (EventSender { tx }, EventReceiver { rx })
    }
}

/// Producer half. Deliberately not `Clone`.
#[derive(Debug)]
pub struct EventSender {
    tx: mpsc::Sender<InboundEvent>,
}

impl EventSender {
    /// Enqueue an event, waiting while the queue is full.
    pub async fn send(&self, event: InboundEvent) -> Result<(), BusClosed> {
        self.tx.send(event).await.map_err(|e| BusClosed(e.0))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<InboundEvent>,
}

impl EventReceiver {
    /// Wait for the next event. `None` once the producer is gone and the
    /// queue is drained.
    pub async fn receive(&mut self) -> Option<InboundEvent> {
        self.rx.recv().await
    }

    /// Take an event if one is ready.
    pub fn try_receive(&mut self) -> Option<InboundEvent> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting events; buffered ones can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
