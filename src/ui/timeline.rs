//! Post list rendering.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_RENOTE, COLOR_WARNING};
use crate::app::App;
use crate::models::Post;

pub fn render_timeline(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" {} timeline ", app.feed.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(title);

    let mut lines: Vec<Line<'static>> = Vec::new();
    if app.posts.is_empty() {
        let hint = if app.connected {
            "Waiting for posts..."
        } else {
            "No posts."
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(COLOR_DIM))));
    }
    for post in app.posts.iter().skip(app.scroll) {
        lines.extend(post_lines(post));
        lines.push(Line::default());
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Lines for one post. A pure renote is shown as "X renoted:" followed by
/// the reshared post; a quote shows its own text and then the quoted post
/// indented.
pub fn post_lines(post: &Post) -> Vec<Line<'static>> {
    match post.renote.as_deref() {
        Some(inner) if post.body().trim().is_empty() && post.cw.is_none() => {
            let mut lines = vec![Line::from(Span::styled(
                format!("{} renoted:", post.user.display_name()),
                Style::default().fg(COLOR_RENOTE),
            ))];
            lines.extend(post_lines(inner));
            lines
        }
        Some(inner) => {
            let mut lines = own_lines(post);
            lines.extend(post_lines(inner).into_iter().map(|line| {
                let mut spans = vec![Span::styled("  > ", Style::default().fg(COLOR_DIM))];
                spans.extend(line.spans);
                Line::from(spans)
            }));
            lines
        }
        None => own_lines(post),
    }
}

fn own_lines(post: &Post) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            post.user.display_name().to_string(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(post.user.handle(), Style::default().fg(COLOR_DIM)),
        Span::styled(
            format!(
                " {}",
                post.created_at.with_timezone(&Local).format("%H:%M:%S")
            ),
            Style::default().fg(COLOR_DIM),
        ),
    ])];

    if let Some(cw) = &post.cw {
        lines.push(Line::from(Span::styled(
            format!("CW: {}", cw),
            Style::default().fg(COLOR_WARNING),
        )));
    }
    lines.extend(post.body().lines().map(|l| Line::from(l.to_string())));

    let reactions = post.total_reactions();
    if post.replies_count > 0 || post.renote_count > 0 || reactions > 0 {
        lines.push(Line::from(Span::styled(
            format!(
                "replies {}  renotes {}  reactions {}",
                post.replies_count, post.renote_count, reactions
            ),
            Style::default().fg(COLOR_DIM),
        )));
    }
    lines
}
