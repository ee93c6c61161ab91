use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::Storage;
use crate::tui::app::App;

use super::helpers::push_right_aligned;

/// App name and open count on the left; pin state and geometry on the right.
pub fn render_title_bar<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let tasks = app.store.tasks();
    let open = tasks.todos.iter().filter(|t| !t.completed).count();

    let mut spans = vec![
        Span::styled(
            " pintask",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}/{} open", open, tasks.len()), dim),
    ];

    let g = app.window.window().geometry();
    let mut right = Vec::new();
    if app.window.pinned() {
        right.push(Span::styled(
            "\u{25CF} pinned  ",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }
    right.push(Span::styled(
        format!("{}x{} at {},{} ", g.width, g.height, g.x, g.y),
        dim,
    ));
    push_right_aligned(&mut spans, right, area.width as usize, Style::default().bg(bg));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with, render_to_string};

    #[test]
    fn shows_counts_pin_and_geometry() {
        let mut app = app_with(&["a", "b"]);
        let id = app.selected_id().unwrap().to_string();
        app.apply(crate::ops::task_ops::Edit::Complete { id });
        let out = render_to_string(60, 1, |frame, area| render_title_bar(frame, &app, area));
        assert!(out.starts_with(" pintask  1/2 open"));
        assert!(out.ends_with("\u{25CF} pinned  360x520 at 100,100"));
    }

    #[test]
    fn unpinned_hides_marker() {
        let mut app = app_with(&[]);
        app.window.toggle_pin();
        let out = render_to_string(60, 1, |frame, area| render_title_bar(frame, &app, area));
        assert!(!out.contains("pinned"));
        assert!(out.contains("360x520 at 100,100"));
    }
}
