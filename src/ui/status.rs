//! Status line and key help line.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::helpers::truncate_to_width;
use super::theme::{COLOR_ACCENT, COLOR_ACTIVE, COLOR_DIM, COLOR_ERROR, COLOR_WARNING};
use crate::app::{App, InputMode};

pub fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Paragraph::new(status_line(app, area.width)), area);
}

pub fn render_help_line(frame: &mut Frame, area: Rect, app: &App) {
    frame.render_widget(Paragraph::new(help_line(app)), area);
}

/// `● connected  @alice  https://host  Home  log errors: N  error: ...`
pub fn status_line(app: &App, width: u16) -> Line<'static> {
    let (dot, label, color) = if app.connected {
        ("●", "connected", COLOR_ACTIVE)
    } else {
        ("○", "disconnected", COLOR_ERROR)
    };

    let mut spans = vec![
        Span::styled(format!("{} {}", dot, label), Style::default().fg(color)),
        Span::raw("  "),
        Span::styled(
            app.account.clone(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.base_url.clone(), Style::default().fg(COLOR_DIM)),
        Span::raw("  "),
        Span::styled(app.feed.label().to_string(), Style::default().fg(COLOR_ACCENT)),
    ];
    if app.log_failures > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("log errors: {}", app.log_failures),
            Style::default().fg(COLOR_WARNING),
        ));
    }

    let used: usize = spans.iter().map(|s| s.width()).sum();
    let room = (width as usize).saturating_sub(used + 2);
    if let Some(err) = &app.last_error {
        if room > 0 {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                truncate_to_width(&format!("error: {}", err), room),
                Style::default().fg(COLOR_ERROR),
            ));
        }
    }
    Line::from(spans)
}

pub fn help_line(app: &App) -> Line<'static> {
    let hints = match app.mode {
        InputMode::Browse => {
            "q quit  Tab/t switch feed  h/l home/local  p post  j/k scroll".to_string()
        }
        InputMode::Compose => format!(
            "Enter/Ctrl+S send  Esc cancel  {} left",
            app.composer_remaining()
        ),
    };
    let mut spans = vec![Span::styled(hints, Style::default().fg(COLOR_DIM))];
    if let Some(message) = &app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(COLOR_ACCENT),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedKind, Instance};

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn app() -> App {
        App::new(
            &Instance::new("https://misskey.example", "alice", "tok"),
            FeedKind::Home,
            10,
        )
    }

    #[test]
    fn test_status_line_disconnected_with_error() {
        let mut app = app();
        app.last_error = Some("refused".to_string());
        let text = text_of(&status_line(&app, 120));
        assert!(text.starts_with("○ disconnected"));
        assert!(text.contains("@alice"));
        assert!(text.contains("https://misskey.example"));
        assert!(text.contains("Home"));
        assert!(text.contains("error: refused"));
    }

    #[test]
    fn test_status_line_connected() {
        let mut app = app();
        app.connected = true;
        app.feed = FeedKind::Local;
        let text = text_of(&status_line(&app, 120));
        assert!(text.starts_with("● connected"));
        assert!(text.contains("Local"));
    }

    #[test]
    fn test_status_line_shows_log_failures() {
        let mut app = app();
        assert!(!text_of(&status_line(&app, 120)).contains("log errors"));

        app.needs_redraw = false;
        app.sync_log_failures(0);
        assert!(!app.needs_redraw);

        app.sync_log_failures(3);
        assert!(app.needs_redraw);
        assert!(text_of(&status_line(&app, 120)).contains("log errors: 3"));
    }

    #[test]
    fn test_help_line_in_compose_mode() {
        let mut app = app();
        app.mode = InputMode::Compose;
        app.composer = "abc".to_string();
        assert!(text_of(&help_line(&app)).contains("2997 left"));
    }
}
