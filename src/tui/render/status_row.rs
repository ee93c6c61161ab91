use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::Storage;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::helpers::push_right_aligned;

/// Render the status row (bottom of screen)
pub fn render_status_row<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let hint = match app.mode {
        Mode::Navigate if app.show_help => "? close help",
        Mode::Navigate if app.window_concealed() => "any key show",
        Mode::Navigate => "a add  e edit  x done  d delete  ? help",
        Mode::Add => "Enter add  Esc cancel",
        Mode::Edit { .. } => "Enter save  Esc done",
        Mode::Snap => "1 top-left  2 top-right  3 bottom-left  4 bottom-right",
    };

    let mut spans = Vec::new();
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!(" {}", unicode::truncate_to_width(notice, width.saturating_sub(1))),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    } else if app.mode == Mode::Snap {
        spans.push(Span::styled(
            " snap to",
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }

    // Hints are optional in navigate mode only; the other modes need them
    let show_hint = app.show_key_hints || app.mode != Mode::Navigate;
    if show_hint {
        push_right_aligned(
            &mut spans,
            vec![Span::styled(format!("{} ", hint), dim)],
            width,
            Style::default().bg(bg),
        );
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
