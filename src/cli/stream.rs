//! The streaming TUI.

use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::adapters::{ReqwestApiClient, TungsteniteConnector};
use crate::app::{run_app, App, StreamServices};
use crate::bus::EventBus;
use crate::config::AppConfig;
use crate::logger::{category, RotatingLogger};
use crate::models::Instance;
use crate::terminal::TerminalManager;
use crate::traits::{ApiClient, Visibility};
use crate::websocket::StreamingSession;

use super::version::version_line;

/// Stream `instance` in the TUI until the user quits.
///
/// The logger is closed exactly once on every path out of here after it
/// has been created.
pub async fn run_stream(config: &AppConfig, instance: Instance, visibility: Visibility) -> Result<()> {
    let logger = Arc::new(RotatingLogger::new(&config.log));
    logger.log(category::SYSTEM, format!("{} starting", version_line()));

    let (events, bus) = EventBus::channel(config.stream.event_buffer);
    let session = match StreamingSession::new(
        &instance,
        &config.stream,
        Arc::new(TungsteniteConnector::new()),
        Arc::clone(&logger),
        events,
    ) {
        Ok(session) => session,
        Err(err) => {
            logger.log(category::ERROR, format!("cannot stream: {}", err));
            logger.close();
            return Err(eyre!("{}", err.user_message()));
        }
    };
    let api: Arc<dyn ApiClient> = match ReqwestApiClient::new(&instance, &config.http) {
        Ok(api) => Arc::new(api),
        Err(err) => {
            logger.log(category::ERROR, format!("cannot build api client: {}", err));
            logger.close();
            return Err(err.into());
        }
    };

    let mut term_manager = match TerminalManager::new() {
        Ok(term_manager) => term_manager,
        Err(err) => {
            session.stop();
            logger.close();
            return Err(err);
        }
    };

    info!(account = %instance.username, "starting stream");
    let session_task = tokio::spawn({
        let session = session.clone();
        async move { session.start().await }
    });

    let mut app = App::new(&instance, config.stream.default_feed, config.stream.max_posts)
        .with_visibility(visibility);
    let event_log = Arc::clone(&logger);
    let services = StreamServices {
        session,
        session_task,
        bus,
        api,
        logger,
    };
    let result = run_app(term_manager.terminal(), &mut app, services).await;
    term_manager.restore()?;
    if let Some(summary) = log_failure_summary(event_log.failures(), &config.log.dir) {
        eprintln!("{}", summary);
    }
    result
}

/// Exit note for event log writes that failed during the run.
pub fn log_failure_summary(failures: usize, dir: &Path) -> Option<String> {
    (failures > 0).then(|| {
        format!(
            "Warning: {} event log write(s) failed; logs in {} may be incomplete",
            failures,
            dir.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_failure_summary() {
        assert_eq!(log_failure_summary(0, Path::new("/tmp/logs")), None);
        let summary = log_failure_summary(2, Path::new("/tmp/logs")).unwrap();
        assert!(summary.contains("2 event log write(s) failed"));
        assert!(summary.contains("/tmp/logs"));
    }
}
