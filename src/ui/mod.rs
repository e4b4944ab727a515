//! UI rendering for the feed client
//!
//! Layout, top to bottom:
//! - Status line: connection state, account, instance, feed, last error
//! - Timeline: most recent posts first
//! - Composer (compose mode only)
//! - Key help and status message

mod composer;
mod helpers;
mod status;
mod theme;
mod timeline;

pub use helpers::truncate_to_width;
pub use status::{help_line, status_line};
pub use theme::{
    COLOR_ACCENT, COLOR_ACTIVE, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_RENOTE, COLOR_WARNING,
};
pub use timeline::post_lines;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::{App, InputMode};
use composer::{render_composer, COMPOSER_HEIGHT};
use status::{render_help_line, render_status_line};
use timeline::render_timeline;

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let composer_height = match app.mode {
        InputMode::Compose => COMPOSER_HEIGHT,
        InputMode::Browse => 0,
    };
    let [status_area, timeline_area, composer_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(composer_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_status_line(frame, status_area, app);
    render_timeline(frame, timeline_area, app);
    if app.mode == InputMode::Compose {
        render_composer(frame, composer_area, app);
    }
    render_help_line(frame, help_area, app);
}
