//! Event, message and key handling for the App.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, AppCommand, AppMessage, InputMode, MAX_POST_CHARS};
use crate::events::InboundEvent;
use crate::models::FeedKind;

impl App {
    /// Apply one event from the session.
    ///
    /// Only `Post` accumulates data; every other event just updates
    /// connection state.
    pub fn handle_event(&mut self, event: InboundEvent) {
        self.mark_dirty();
        match event {
            InboundEvent::Connected { feed } => {
                self.connected = true;
                self.feed = feed;
                self.last_error = None;
            }
            InboundEvent::Disconnected { cause } => {
                self.connected = false;
                if cause.is_some() {
                    self.last_error = cause;
                }
            }
            InboundEvent::ConnectError { cause } => {
                self.connected = false;
                self.last_error = Some(cause);
            }
            InboundEvent::FeedChanged { to, .. } => {
                self.feed = to;
            }
            InboundEvent::PingReceived { .. } | InboundEvent::PongReceived { .. } => {
                self.keepalives += 1;
            }
            InboundEvent::Post(post) => {
                self.posts.push_front(*post);
                self.posts.truncate(self.max_posts);
                // Keep the same posts on screen while scrolled back
                if self.scroll > 0 {
                    self.scroll = (self.scroll + 1).min(self.posts.len().saturating_sub(1));
                }
            }
        }
    }

    /// Handle an incoming async message
    pub fn handle_message(&mut self, msg: AppMessage) {
        self.mark_dirty();
        match msg {
            AppMessage::PostSubmitted(Ok(id)) => {
                self.posting = false;
                self.composer.clear();
                self.mode = InputMode::Browse;
                self.status_message = Some(format!("Posted ({})", id));
            }
            AppMessage::PostSubmitted(Err(reason)) => {
                self.posting = false;
                self.status_message = Some(format!("Post failed: {}", reason));
            }
        }
    }

    /// Map a key press to a state change and, possibly, a command.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        self.mark_dirty();
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppCommand::Quit);
        }
        match self.mode {
            InputMode::Browse => self.handle_browse_key(key),
            InputMode::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') => Some(AppCommand::Quit),
            KeyCode::Tab | KeyCode::Char('t') => Some(AppCommand::ToggleFeed),
            KeyCode::Char('h') if self.feed == FeedKind::Local => Some(AppCommand::ToggleFeed),
            KeyCode::Char('l') if self.feed == FeedKind::Home => Some(AppCommand::ToggleFeed),
            KeyCode::Char('p') | KeyCode::Char('i') => {
                self.mode = InputMode::Compose;
                self.status_message = None;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.scroll + 1 < self.posts.len() {
                    self.scroll += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll = 0;
                None
            }
            _ => None,
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Browse;
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Backspace => {
                self.composer.pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.composer.chars().count() < MAX_POST_CHARS {
                    self.composer.push(c);
                }
                None
            }
            _ => None,
        }
    }

    fn submit(&mut self) -> Option<AppCommand> {
        if self.posting || self.composer.trim().is_empty() {
            return None;
        }
        self.posting = true;
        self.status_message = Some("Posting...".to_string());
        Some(AppCommand::SubmitPost(self.composer.clone()))
    }
}
