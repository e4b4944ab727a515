//! Application state for the TUI.
//!
//! This module contains the core [`App`] struct and related types:
//! - [`InputMode`] - browsing the timeline or composing a post
//! - [`AppCommand`] - requests produced by key handling
//! - [`AppMessage`] - results of background work
//!
//! [`run_app`] drives the state from terminal input, the EventBus and
//! background task results.

mod handlers;
mod messages;
mod runner;

pub use messages::AppMessage;
pub use runner::{run_app, shutdown_session, StreamServices, SHUTDOWN_TIMEOUT};

use std::collections::VecDeque;

use crate::models::{FeedKind, Instance, Post};
use crate::traits::Visibility;

/// Longest post the composer accepts, in characters.
pub const MAX_POST_CHARS: usize = 3000;

/// Which keys the UI is listening for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browse,
    Compose,
}

/// Request produced by a key press, carried out by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ToggleFeed,
    SubmitPost(String),
    Quit,
}

/// View state of the client
#[derive(Debug)]
pub struct App {
    /// `@username` of the account being streamed
    pub account: String,
    pub base_url: String,
    pub feed: FeedKind,
    pub connected: bool,
    /// Last connection failure or close reason
    pub last_error: Option<String>,
    /// Most recent first, bounded by `max_posts`
    pub posts: VecDeque<Post>,
    pub max_posts: usize,
    /// Index into `posts` of the first post drawn
    pub scroll: usize,
    pub mode: InputMode,
    pub composer: String,
    /// Visibility used for submitted posts
    pub visibility: Visibility,
    /// A submission is in flight
    pub posting: bool,
    pub status_message: Option<String>,
    /// Pings and pongs seen on the stream
    pub keepalives: u64,
    /// Event log writes that failed so far
    pub log_failures: usize,
    pub should_quit: bool,
    /// Set whenever visible state changes
    pub needs_redraw: bool,
}

impl App {
    pub fn new(instance: &Instance, feed: FeedKind, max_posts: usize) -> Self {
        Self {
            account: format!("@{}", instance.username),
            base_url: instance.base_url.clone(),
            feed,
            connected: false,
            last_error: None,
            posts: VecDeque::with_capacity(max_posts.max(1)),
            max_posts: max_posts.max(1),
            scroll: 0,
            mode: InputMode::default(),
            composer: String::new(),
            visibility: Visibility::default(),
            posting: false,
            status_message: None,
            keepalives: 0,
            log_failures: 0,
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.mark_dirty();
    }

    /// Track the logger's failure count; redraws only when it moves.
    pub fn sync_log_failures(&mut self, failures: usize) {
        if failures != self.log_failures {
            self.log_failures = failures;
            self.mark_dirty();
        }
    }

    /// Characters left before the composer is full.
    pub fn composer_remaining(&self) -> usize {
        MAX_POST_CHARS.saturating_sub(self.composer.chars().count())
    }
}
