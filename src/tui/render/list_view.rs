use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::Storage;
use crate::tui::app::{App, Mode};
use crate::tui::rows::TaskRow;
use crate::util::unicode;

use super::helpers::{edit_spans, spans_width};

/// Screen lines per task: title line plus metadata line
const ROW_HEIGHT: usize = 2;
/// Left gutter: cursor bar, checkbox, space
const GUTTER: usize = 5;

/// Render the task list, with the add line after the last task while adding
pub fn render_list_view<S: Storage>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;
    let rows = app.rows_at(&chrono::Local::now());
    let adding = app.mode == Mode::Add;

    if rows.is_empty() && !adding {
        let hint = Line::from(Span::styled(
            " No tasks. Press a to add one.",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(hint).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the cursor row in view
    let reserved = usize::from(adding);
    let visible = (height.saturating_sub(reserved) / ROW_HEIGHT).max(1);
    if adding {
        app.scroll_offset = rows.len().saturating_sub(visible);
    } else if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible {
        app.scroll_offset = app.cursor + 1 - visible;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, row) in rows.iter().enumerate().skip(app.scroll_offset).take(visible) {
        let is_cursor = i == app.cursor && !adding;
        let editing = matches!(&app.mode, Mode::Edit { id } if *id == row.id);
        lines.push(title_line(app, row, is_cursor, editing, width));
        lines.push(meta_line(app, row, is_cursor, width));
    }

    if adding {
        let prompt = Style::default().fg(app.theme.highlight).bg(bg);
        let mut spans = vec![Span::styled(" +   ", prompt)];
        spans.extend(edit_spans(
            &app.edit_buffer,
            app.edit_cursor,
            width.saturating_sub(GUTTER),
            Style::default().fg(app.theme.text_bright).bg(bg),
            cursor_style(app),
        ));
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn cursor_style<S: Storage>(app: &App<S>) -> Style {
    Style::default()
        .fg(app.theme.background)
        .bg(app.theme.text_bright)
}

fn row_bg<S: Storage>(app: &App<S>, is_cursor: bool) -> ratatui::style::Color {
    if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    }
}

fn title_line<'a, S: Storage>(
    app: &App<S>,
    row: &TaskRow,
    is_cursor: bool,
    editing: bool,
    width: usize,
) -> Line<'a> {
    let bg = row_bg(app, is_cursor);
    let mut spans: Vec<Span> = Vec::new();

    if is_cursor {
        spans.push(Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.selection_border).bg(bg),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let check_color = if row.completed {
        app.theme.green
    } else {
        app.theme.text
    };
    spans.push(Span::styled(row.checkbox(), Style::default().fg(check_color).bg(bg)));
    spans.push(Span::styled(" ", Style::default().bg(bg)));

    let room = width.saturating_sub(GUTTER);
    if editing {
        spans.extend(edit_spans(
            &app.edit_buffer,
            app.edit_cursor,
            room,
            Style::default().fg(app.theme.text_bright).bg(bg),
            cursor_style(app),
        ));
    } else {
        let title_style = if row.completed {
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(app.theme.text_bright).bg(bg)
        };
        spans.push(Span::styled(
            unicode::truncate_to_width(&row.title, room),
            title_style,
        ));
    }

    fill_to(&mut spans, width, bg);
    Line::from(spans)
}

fn meta_line<'a, S: Storage>(
    app: &App<S>,
    row: &TaskRow,
    is_cursor: bool,
    width: usize,
) -> Line<'a> {
    let bg = row_bg(app, is_cursor);
    let mut spans = vec![Span::styled(" ".repeat(GUTTER), Style::default().bg(bg))];
    spans.push(Span::styled(
        unicode::truncate_to_width(&row.meta, width.saturating_sub(GUTTER)),
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    fill_to(&mut spans, width, bg);
    Line::from(spans)
}

/// Extend the row background to the full width.
fn fill_to(spans: &mut Vec<Span>, width: usize, bg: ratatui::style::Color) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
    }
}
