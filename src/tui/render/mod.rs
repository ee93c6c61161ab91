pub mod help_overlay;
mod helpers;
pub mod list_view;
pub mod status_row;
pub mod title_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::io::storage::Storage;

use super::app::App;

/// Main render function: title bar, task list, status row
pub fn render<S: Storage>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    title_bar::render_title_bar(frame, app, chunks[0]);

    if app.window_concealed() {
        render_concealed(frame, app, chunks[1]);
    } else {
        list_view::render_list_view(frame, app, chunks[1]);
    }

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Stand-in for a window that is out of sight.
fn render_concealed<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let state = if app.window.window().is_minimized() {
        "window minimized"
    } else {
        "window hidden"
    };
    let top = area.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = vec![Line::from(""); top as usize];
    lines.push(Line::from(Span::styled(
        state,
        Style::default().fg(app.theme.text).bg(bg),
    )));
    lines.push(Line::from(Span::styled(
        "press any key to show",
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{app_with, render_to_string};
    use super::*;

    #[test]
    fn full_screen_layout() {
        let mut app = app_with(&["Buy milk", "Call mom"]);
        let out = render_to_string(50, 10, |frame, _| render(frame, &mut app));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("pintask"));
        assert!(out.contains("[ ] Buy milk"));
        assert!(out.contains("[ ] Call mom"));
    }

    #[test]
    fn hidden_window_replaces_list() {
        let mut app = app_with(&["Buy milk"]);
        app.window.hide();
        let out = render_to_string(50, 10, |frame, _| render(frame, &mut app));
        assert!(out.contains("window hidden"));
        assert!(out.contains("press any key to show"));
        assert!(!out.contains("Buy milk"));
    }

    #[test]
    fn minimized_window_says_so() {
        let mut app = app_with(&[]);
        app.window.minimize();
        let out = render_to_string(50, 10, |frame, _| render(frame, &mut app));
        assert!(out.contains("window minimized"));
    }

    #[test]
    fn help_overlay_on_top() {
        let mut app = app_with(&["Buy milk"]);
        app.show_help = true;
        let out = render_to_string(60, 30, |frame, _| render(frame, &mut app));
        assert!(out.contains("Key Bindings"));
    }
}
