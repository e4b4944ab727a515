//! The UI event loop.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{App, AppCommand, AppMessage};
use crate::bus::EventReceiver;
use crate::error::SessionError;
use crate::logger::{category, RotatingLogger};
use crate::traits::ApiClient;
use crate::ui;
use crate::websocket::StreamingSession;

/// How long quitting waits for the session to finish its teardown.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything the UI loop talks to besides the terminal.
pub struct StreamServices {
    pub session: StreamingSession,
    /// Task running `session.start()`
    pub session_task: JoinHandle<Result<(), SessionError>>,
    pub bus: EventReceiver,
    pub api: Arc<dyn ApiClient>,
    pub logger: Arc<RotatingLogger>,
}

/// Run the UI until the user quits.
///
/// The loop waits on terminal input, the EventBus and post results. It
/// never waits on the session itself: feed switches and stop are
/// requests the receive loop carries out.
pub async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    services: StreamServices,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let StreamServices {
        session,
        session_task,
        bus,
        api,
        logger,
    } = services;

    let mut event_stream = EventStream::new();
    let (message_tx, mut message_rx) = mpsc::unbounded_channel::<AppMessage>();
    // None once the session has ended and the bus is drained
    let mut bus = Some(bus);

    logger.log(category::UI, "ui started");

    let result = loop {
        app.sync_log_failures(logger.failures());
        if app.needs_redraw {
            if let Err(err) = terminal.draw(|f| ui::render(f, app)) {
                break Err(err.into());
            }
            app.needs_redraw = false;
        }
        if app.should_quit {
            break Ok(());
        }

        tokio::select! {
            event_result = event_stream.next() => match event_result {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = app.handle_key(key) {
                        dispatch(command, app, &session, &api, &logger, &message_tx);
                    }
                }
                Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(error = %err, "terminal input error");
                    logger.log(category::ERROR, format!("terminal input error: {}", err));
                }
                None => {
                    info!("terminal input closed");
                    app.quit();
                }
            },

            event = next_event(&mut bus), if bus.is_some() => match event {
                Some(event) => app.handle_event(event),
                None => {
                    debug!("event bus closed");
                    bus = None;
                }
            },

            Some(message) = message_rx.recv() => app.handle_message(message),
        }
    };

    shutdown_session(session, session_task, bus, &logger).await;
    result
}

async fn next_event(bus: &mut Option<EventReceiver>) -> Option<crate::events::InboundEvent> {
    match bus.as_mut() {
        Some(bus) => bus.receive().await,
        None => None,
    }
}

fn dispatch(
    command: AppCommand,
    app: &mut App,
    session: &StreamingSession,
    api: &Arc<dyn ApiClient>,
    logger: &Arc<RotatingLogger>,
    message_tx: &mpsc::UnboundedSender<AppMessage>,
) {
    match command {
        AppCommand::Quit => {
            logger.log(category::UI, "quit requested");
            app.quit();
        }
        AppCommand::ToggleFeed => {
            if session.toggle_feed() {
                logger.log(category::UI, "feed toggle requested");
            } else {
                app.set_status("Not connected");
            }
        }
        AppCommand::SubmitPost(text) => {
            logger.log(category::UI, "post submitted");
            let api = Arc::clone(api);
            let logger = Arc::clone(logger);
            let tx = message_tx.clone();
            let visibility = app.visibility;
            tokio::spawn(async move {
                let result = api.create_post(visibility, &text).await.map_err(|err| {
                    warn!(error = %err, "post failed");
                    logger.log(category::ERROR, format!("post failed: {}", err));
                    err.user_message()
                });
                let _ = tx.send(AppMessage::PostSubmitted(result));
            });
        }
    }
}

/// Stop the session, wait for its teardown, then close the logger.
///
/// The logger is closed last so it records the whole teardown.
pub async fn shutdown_session(
    session: StreamingSession,
    session_task: JoinHandle<Result<(), SessionError>>,
    bus: Option<EventReceiver>,
    logger: &RotatingLogger,
) {
    session.stop();
    // A receive loop blocked on a full bus sees the consumer go away.
    drop(bus);

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, session_task).await {
        Ok(Ok(Ok(()))) => debug!("session task finished"),
        Ok(Ok(Err(err))) => debug!(error = %err, "session ended early"),
        Ok(Err(err)) => warn!(error = %err, "session task failed"),
        Err(_) => warn!("session teardown timed out"),
    }
    logger.close();
}
