//! Streaming session: one connection, one live subscription.
//!
//! `start()` connects, subscribes to the default feed and then runs the
//! receive loop until the connection ends or `stop()` is called. The loop
//! is the only producer on the EventBus; `toggle_feed()` is queued to it
//! so feed switches are ordered with respect to inbound frames.
//!
//! State machine:
//!
//! ```text
//! Idle -> Connecting -> Connected(sub) -> Disconnecting -> Closed
//!   |          |                                             ^
//!   |          +--- connect error / timeout / stop ----------+
//!   +--- stop() before start() ------------------------------+
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::endpoint::resolve_stream_url;
use super::messages::{decode_inbound, encode_pong, encode_subscribe, encode_unsubscribe};
use crate::bus::{BusClosed, EventSender};
use crate::config::StreamConfig;
use crate::error::{ResolveError, SessionError, TransportError};
use crate::events::InboundEvent;
use crate::logger::{category, RotatingLogger};
use crate::models::{FeedKind, Instance, Subscription, SubscriptionId};
use crate::traits::{Frame, FrameSink, FrameStream, TransportConnector};

/// Lifecycle state of a [`StreamingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Connected(Subscription),
    Disconnecting,
    Closed,
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected(_))
    }
}

#[derive(Debug)]
enum SessionCommand {
    ToggleFeed,
}

/// Why the receive loop ended.
enum LoopEnd {
    Stopped,
    PeerClosed(Option<String>),
    Failed(String),
    ConsumerGone,
}

enum Flow {
    Continue,
    End(LoopEnd),
}

/// Handle to a streaming session. Clones share the same session.
///
/// # Example
///
/// ```ignore
/// let (events, mut bus) = EventBus::channel(config.stream.event_buffer);
/// let session = StreamingSession::new(&instance, &config.stream, connector, logger, events)?;
/// let task = tokio::spawn({
///     let session = session.clone();
///     async move { session.start().await }
/// });
/// while let Some(event) = bus.receive().await { /* ... */ }
/// ```
#[derive(Clone)]
pub struct StreamingSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    endpoint: String,
    default_feed: FeedKind,
    connect_timeout: Duration,
    connector: Arc<dyn TransportConnector>,
    logger: Arc<RotatingLogger>,
    status: Mutex<Status>,
    /// Single writer lock serializing every frame the session sends
    writer: tokio::sync::Mutex<Option<Box<dyn FrameSink>>>,
    shutdown: watch::Sender<bool>,
    commands: mpsc::UnboundedSender<SessionCommand>,
    loop_parts: Mutex<Option<LoopParts>>,
}

struct Status {
    state: SessionState,
    feed: FeedKind,
}

/// Owned by the receive loop once `start()` runs.
struct LoopParts {
    events: EventSender,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    shutdown: watch::Receiver<bool>,
}

impl StreamingSession {
    /// Create an idle session for `instance`.
    ///
    /// # Errors
    /// [`ResolveError`] if the instance's base URL or token cannot form a
    /// stream endpoint.
    pub fn new(
        instance: &Instance,
        config: &StreamConfig,
        connector: Arc<dyn TransportConnector>,
        logger: Arc<RotatingLogger>,
        events: EventSender,
    ) -> Result<Self, ResolveError> {
        let endpoint = resolve_stream_url(&instance.base_url, &instance.access_token)?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (commands, commands_rx) = mpsc::unbounded_channel();

        Ok(Self {
            inner: Arc::new(SessionInner {
                endpoint,
                default_feed: config.default_feed,
                connect_timeout: config.connect_timeout(),
                connector,
                logger,
                status: Mutex::new(Status {
                    state: SessionState::Idle,
                    feed: config.default_feed,
                }),
                writer: tokio::sync::Mutex::new(None),
                shutdown,
                commands,
                loop_parts: Mutex::new(Some(LoopParts {
                    events,
                    commands: commands_rx,
                    shutdown: shutdown_rx,
                })),
            }),
        })
    }

    /// Connect and run the receive loop until teardown.
    ///
    /// Run this on its own task. Every way the session can end is
    /// reported as exactly one terminal event on the bus, so the return
    /// value only signals lifecycle misuse.
    ///
    /// # Errors
    /// [`SessionError::AlreadyStarted`] if the session is not idle,
    /// [`SessionError::Closed`] if it was stopped before starting.
    pub async fn start(&self) -> Result<(), SessionError> {
        {
            let mut status = self.inner.status();
            let state = status.state;
            match state {
                SessionState::Idle => status.state = SessionState::Connecting,
                SessionState::Closed => return Err(SessionError::Closed),
                _ => return Err(SessionError::AlreadyStarted),
            }
        }
        let parts = self
            .inner
            .loop_parts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(LoopParts {
            events,
            mut commands,
            mut shutdown,
        }) = parts
        else {
            return Err(SessionError::AlreadyStarted);
        };

        let (sink, stream) = match self.connect(&mut shutdown).await {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                info!("stream stopped while connecting");
                self.inner.set_state(SessionState::Closed);
                self.log_event(&events, InboundEvent::Disconnected { cause: None })
                    .await
                    .ok();
                self.inner.logger.flush();
                return Ok(());
            }
            Err(err) => {
                warn!(error = %err, "stream connect failed");
                self.inner.set_state(SessionState::Closed);
                self.inner
                    .logger
                    .log(category::ERROR, format!("connect failed: {}", err));
                self.log_event(
                    &events,
                    InboundEvent::ConnectError {
                        cause: err.to_string(),
                    },
                )
                .await
                .ok();
                self.inner.logger.flush();
                return Ok(());
            }
        };

        let mut current = Subscription::new(self.inner.default_feed);
        let mut used_ids = HashSet::from([current.id]);
        *self.inner.writer.lock().await = Some(sink);

        let end = match self.open_subscription(&events, current).await {
            Ok(()) => {
                self.receive_loop(
                    stream,
                    &events,
                    &mut commands,
                    &mut shutdown,
                    &mut current,
                    &mut used_ids,
                )
                .await
            }
            Err(_) => LoopEnd::ConsumerGone,
        };

        self.teardown(end, &events, &current).await;
        Ok(())
    }

    /// Request the receive loop to unwind.
    ///
    /// Idempotent. Before `start()` it closes the session outright without
    /// emitting anything.
    pub fn stop(&self) {
        let mut status = self.inner.status();
        let state = status.state;
        match state {
            SessionState::Idle => {
                status.state = SessionState::Closed;
                drop(status);
                // Dropping the parts drops the only EventSender.
                self.inner
                    .loop_parts
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                self.inner
                    .logger
                    .log(category::WEBSOCKET, "session stopped before start");
            }
            SessionState::Connecting | SessionState::Connected(_) => {
                drop(status);
                let already = self.inner.shutdown.send_replace(true);
                if !already {
                    debug!("stream stop requested");
                    self.inner.logger.log(category::WEBSOCKET, "stop requested");
                }
            }
            SessionState::Disconnecting | SessionState::Closed => {}
        }
    }

    /// Switch between Home and Local.
    ///
    /// Fire-and-forget: the switch runs on the receive loop, which emits
    /// `FeedChanged` when it is done. Returns false (and does nothing) when
    /// the session is not connected.
    pub fn toggle_feed(&self) -> bool {
        if !self.state().is_connected() {
            return false;
        }
        self.inner.commands.send(SessionCommand::ToggleFeed).is_ok()
    }

    /// Send a keepalive acknowledgement.
    pub async fn pong(&self, payload: &[u8]) -> Result<(), SessionError> {
        let mut writer = self.inner.writer.lock().await;
        let sink = writer.as_mut().ok_or(SessionError::NotConnected)?;
        sink.send(encode_pong(payload)).await?;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.inner.status().state
    }

    /// Feed of the active subscription, or the last one before closing.
    pub fn current_feed(&self) -> FeedKind {
        self.inner.status().feed
    }

    /// Resolved stream URL (includes the access token).
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Open the transport, bounded by the connect timeout. `Ok(None)`
    /// means `stop()` won the race.
    async fn connect(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Option<(Box<dyn FrameSink>, Box<dyn FrameStream>)>, TransportError> {
        self.inner.logger.log(
            category::WEBSOCKET,
            format!("connecting to {}", redacted(&self.inner.endpoint)),
        );
        let attempt = tokio::time::timeout(
            self.inner.connect_timeout,
            self.inner.connector.connect(&self.inner.endpoint),
        );

        tokio::select! {
            biased;
            _ = wait_for_shutdown(shutdown) => Ok(None),
            result = attempt => match result {
                Ok(Ok(pair)) => Ok(Some(pair)),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(TransportError::Timeout {
                    secs: self.inner.connect_timeout.as_secs(),
                }),
            },
        }
    }

    /// Announce the connection and subscribe to the default feed.
    async fn open_subscription(
        &self,
        events: &EventSender,
        subscription: Subscription,
    ) -> Result<(), BusClosed> {
        self.inner.set_state(SessionState::Connected(subscription));
        info!(feed = %subscription.feed, "stream connected");
        self.log_event(
            events,
            InboundEvent::Connected {
                feed: subscription.feed,
            },
        )
        .await?;

        let frame = encode_subscribe(subscription.feed, &subscription.id);
        if let Err(err) = self.send_text(frame).await {
            warn!(error = %err, "subscribe failed");
            self.inner
                .logger
                .log(category::ERROR, format!("subscribe failed: {}", err));
        }
        Ok(())
    }

    async fn receive_loop(
        &self,
        mut stream: Box<dyn FrameStream>,
        events: &EventSender,
        commands: &mut mpsc::UnboundedReceiver<SessionCommand>,
        shutdown: &mut watch::Receiver<bool>,
        current: &mut Subscription,
        used_ids: &mut HashSet<SubscriptionId>,
    ) -> LoopEnd {
        loop {
            tokio::select! {
                biased;
                _ = wait_for_shutdown(shutdown) => return LoopEnd::Stopped,
                Some(command) = commands.recv() => match command {
                    SessionCommand::ToggleFeed => {
                        if self.switch_feed(events, current, used_ids).await.is_err() {
                            return LoopEnd::ConsumerGone;
                        }
                    }
                },
                frame = stream.next_frame() => {
                    if let Flow::End(end) = self.handle_frame(frame, events, current).await {
                        return end;
                    }
                }
            }
        }
    }

    async fn handle_frame(
        &self,
        frame: Option<Result<Frame, TransportError>>,
        events: &EventSender,
        current: &Subscription,
    ) -> Flow {
        let logger = &self.inner.logger;
        let delivered = match frame {
            Some(Ok(Frame::Text(text))) => {
                logger.log(category::WEBSOCKET, format!("received: {}", text));
                match decode_inbound(&text) {
                    Ok(decoded) if current.id.matches(&decoded.channel_id) => {
                        self.log_event(events, InboundEvent::Post(Box::new(decoded.post)))
                            .await
                    }
                    Ok(decoded) => {
                        debug!(channel = %decoded.channel_id, "dropping post for stale channel");
                        logger.log(
                            category::WEBSOCKET,
                            format!("dropped post for stale channel {}", decoded.channel_id),
                        );
                        Ok(())
                    }
                    Err(err) => {
                        debug!(error = %err, "dropping undecodable frame");
                        logger.log(category::ERROR, format!("dropped frame: {}", err));
                        Ok(())
                    }
                }
            }
            Some(Ok(Frame::Ping(payload))) => {
                logger.log(category::WEBSOCKET, "received ping");
                // Answer before publishing: a full bus must not hold back the pong.
                if let Err(err) = self.pong(&payload).await {
                    warn!(error = %err, "pong failed");
                    logger.log(category::ERROR, format!("pong failed: {}", err));
                }
                self.log_event(events, InboundEvent::PingReceived { payload })
                    .await
            }
            Some(Ok(Frame::Pong(payload))) => {
                logger.log(category::WEBSOCKET, "received pong");
                self.log_event(events, InboundEvent::PongReceived { payload })
                    .await
            }
            Some(Ok(Frame::Binary(data))) => {
                logger.log(
                    category::WEBSOCKET,
                    format!("ignored binary frame ({} bytes)", data.len()),
                );
                Ok(())
            }
            Some(Ok(Frame::Close(reason))) => {
                return Flow::End(LoopEnd::PeerClosed(reason));
            }
            Some(Err(TransportError::Closed)) | None => {
                return Flow::End(LoopEnd::PeerClosed(None));
            }
            Some(Err(err)) => return Flow::End(LoopEnd::Failed(err.to_string())),
        };

        match delivered {
            Ok(()) => Flow::Continue,
            Err(_) => Flow::End(LoopEnd::ConsumerGone),
        }
    }

    /// Unsubscribe the current channel and subscribe the other feed under
    /// a fresh id.
    async fn switch_feed(
        &self,
        events: &EventSender,
        current: &mut Subscription,
        used_ids: &mut HashSet<SubscriptionId>,
    ) -> Result<(), BusClosed> {
        if !self.state().is_connected() {
            return Ok(());
        }
        let from = current.feed;
        let mut next = Subscription::new(from.toggled());
        while !used_ids.insert(next.id) {
            next = Subscription::new(next.feed);
        }

        {
            // Both frames go out back to back; a pong cannot land between them.
            let mut writer = self.inner.writer.lock().await;
            if let Some(sink) = writer.as_mut() {
                for text in [
                    encode_unsubscribe(&current.id),
                    encode_subscribe(next.feed, &next.id),
                ] {
                    if let Err(err) = self.write_text(sink, text).await {
                        warn!(error = %err, "feed switch send failed");
                        self.inner
                            .logger
                            .log(category::ERROR, format!("feed switch send failed: {}", err));
                    }
                }
            }
        }

        *current = next;
        self.inner.set_state(SessionState::Connected(next));
        info!(from = %from, to = %next.feed, "feed switched");
        self.log_event(
            events,
            InboundEvent::FeedChanged {
                from,
                to: next.feed,
            },
        )
        .await
    }

    async fn teardown(&self, end: LoopEnd, events: &EventSender, current: &Subscription) {
        self.inner.set_state(SessionState::Disconnecting);

        let peer_gone = matches!(end, LoopEnd::PeerClosed(_) | LoopEnd::Failed(_));
        let sink = {
            let mut writer = self.inner.writer.lock().await;
            if !peer_gone {
                if let Some(sink) = writer.as_mut() {
                    // Best effort: the server may already have dropped the channel.
                    if let Err(err) = self
                        .write_text(sink, encode_unsubscribe(&current.id))
                        .await
                    {
                        debug!(error = %err, "unsubscribe on teardown failed");
                        self.inner
                            .logger
                            .log(category::ERROR, format!("unsubscribe failed: {}", err));
                    }
                }
            }
            writer.take()
        };
        if let Some(mut sink) = sink {
            if let Err(err) = sink.close().await {
                debug!(error = %err, "transport close failed");
            }
        }

        self.inner.set_state(SessionState::Closed);

        let terminal = match end {
            LoopEnd::Stopped => Some(InboundEvent::Disconnected { cause: None }),
            LoopEnd::PeerClosed(cause) => Some(InboundEvent::Disconnected { cause }),
            LoopEnd::Failed(cause) => Some(InboundEvent::ConnectError { cause }),
            LoopEnd::ConsumerGone => None,
        };
        match terminal {
            Some(event) => {
                info!(event = event.name(), "stream closed");
                self.log_event(events, event).await.ok();
            }
            None => {
                info!("stream closed, event consumer gone");
                self.inner
                    .logger
                    .log(category::WEBSOCKET, "event consumer gone");
            }
        }
        self.inner.logger.log(category::WEBSOCKET, "session closed");
        self.inner.logger.flush();
    }

    async fn send_text(&self, text: String) -> Result<(), SessionError> {
        let mut writer = self.inner.writer.lock().await;
        let sink = writer.as_mut().ok_or(SessionError::NotConnected)?;
        self.write_text(sink, text).await?;
        Ok(())
    }

    async fn write_text(
        &self,
        sink: &mut Box<dyn FrameSink>,
        text: String,
    ) -> Result<(), TransportError> {
        self.inner
            .logger
            .log(category::WEBSOCKET, format!("sent: {}", text));
        sink.send(Frame::Text(text)).await
    }

    async fn log_event(&self, events: &EventSender, event: InboundEvent) -> Result<(), BusClosed> {
        self.inner.logger.log(category::EVENT, event.name());
        events.send(event).await
    }
}

impl SessionInner {
    fn status(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) {
        let mut status = self.status();
        if let SessionState::Connected(subscription) = state {
            status.feed = subscription.feed;
        }
        status.state = state;
    }
}

/// Resolve once the shutdown flag is set.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        let stopped = *shutdown.borrow_and_update();
        if stopped {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Stream URL with the access token masked, for logs.
fn redacted(endpoint: &str) -> String {
    match endpoint.split_once("?i=") {
        Some((head, _)) => format!("{}?i=***", head),
        None => endpoint.to_string(),
    }
}
