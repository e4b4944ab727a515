//! Post composer box.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::theme::{COLOR_ACCENT, COLOR_BORDER};
use crate::app::App;

/// Rows the composer takes when open, borders included.
pub const COMPOSER_HEIGHT: u16 = 5;

pub fn render_composer(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.posting {
        " New post (sending...) ".to_string()
    } else {
        format!(" New post ({}) ", app.visibility)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.posting {
            COLOR_BORDER
        } else {
            COLOR_ACCENT
        }))
        .title(title);

    let paragraph = Paragraph::new(format!("{}_", app.composer))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
