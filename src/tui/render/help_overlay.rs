use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::io::storage::Storage;
use crate::tui::app::App;

const TASK_KEYS: &[(&str, &str)] = &[
    ("\u{2191}\u{2193}/jk", "Select task"),
    ("g/G", "First / last task"),
    ("a", "Add task"),
    ("Enter/e", "Edit title"),
    ("Space/x", "Mark done"),
    ("d/Del", "Delete task"),
];

const EDIT_KEYS: &[(&str, &str)] = &[
    ("Enter", "Save"),
    ("Esc", "Save title / cancel add"),
    ("^A ^E", "Start / end of line"),
    ("^W ^U", "Delete word / to start"),
];

const WINDOW_KEYS: &[(&str, &str)] = &[
    ("p", "Pin on top"),
    ("m", "Minimize"),
    ("s 1-4", "Snap to corner"),
    ("HJKL", "Move window"),
    ("+/-", "Resize window"),
    ("w", "Close button"),
    ("q", "Quit"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let overlay_area = centered_rect(80, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (title, keys) in [
        (" Tasks", TASK_KEYS),
        (" Editing", EDIT_KEYS),
        (" Window", WINDOW_KEYS),
    ] {
        lines.push(Line::from(Span::styled(title, header_style)));
        for &(key, desc) in keys {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<10}", key), key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
