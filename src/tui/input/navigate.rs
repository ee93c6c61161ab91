use crossterm::event::{KeyCode, KeyEvent};

use crate::io::storage::Storage;
use crate::model::window::Corner;
use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    // Help overlay swallows everything but its own toggles
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    let step = app.move_step;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.notice = None,

        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.move_cursor(isize::MAX),

        KeyCode::Char('a') => {
            app.edit_buffer.clear();
            app.edit_cursor = 0;
            app.mode = Mode::Add;
        }
        KeyCode::Enter | KeyCode::Char('e') => begin_title_edit(app),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(edit) = selected_row(app).and_then(|row| row.toggle()) {
                app.apply(edit);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(row) = selected_row(app) {
                app.apply(row.delete());
            }
        }

        KeyCode::Char('p') => {
            let pinned = app.window.toggle_pin();
            app.notice = Some(if pinned { "pinned on top" } else { "unpinned" }.to_string());
        }
        KeyCode::Char('m') => app.window.minimize(),
        KeyCode::Char('w') => app.request_close(),
        KeyCode::Char('s') => app.mode = Mode::Snap,
        KeyCode::Char('H') => app.window.move_by(-step, 0),
        KeyCode::Char('L') => app.window.move_by(step, 0),
        KeyCode::Char('K') => app.window.move_by(0, -step),
        KeyCode::Char('J') => app.window.move_by(0, step),
        KeyCode::Char('+') | KeyCode::Char('=') => app.window.resize_by(step, step),
        KeyCode::Char('-') => app.window.resize_by(-step, -step),
        _ => {}
    }
}

/// Second key after `s`: a corner digit, anything else cancels.
pub(super) fn handle_snap<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    app.mode = Mode::Navigate;
    let corner = match key.code {
        KeyCode::Char(c @ '1'..='4') => Corner::ALL[(c as usize) - ('1' as usize)],
        _ => return,
    };
    if let Some(pos) = app.window.snap(corner) {
        app.notice = Some(format!("snapped {} ({}, {})", corner.label(), pos.x, pos.y));
    }
}

fn begin_title_edit<S: Storage>(app: &mut App<S>) {
    let Some(task) = app.store.tasks().todos.get(app.cursor) else {
        return;
    };
    app.edit_buffer = task.title.clone();
    app.edit_cursor = app.edit_buffer.len();
    app.mode = Mode::Edit {
        id: task.id.clone(),
    };
}

fn selected_row<S: Storage>(app: &App<S>) -> Option<crate::tui::rows::TaskRow> {
    let now = chrono::Local::now();
    app.rows_at(&now).into_iter().nth(app.cursor)
}
