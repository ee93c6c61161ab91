use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::storage::Storage;
use crate::ops::task_ops::Edit;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Keys for the add line and the inline title editor.
pub(super) fn handle_edit<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Shift+Enter is not a confirm key
        (m, KeyCode::Enter) if !m.contains(KeyModifiers::SHIFT) => {
            if app.mode == Mode::Add {
                commit_add(app);
            } else {
                commit_title(app);
            }
        }
        // Esc abandons a new task but leaves an existing title committed
        (_, KeyCode::Esc) => {
            if app.mode == Mode::Add {
                finish(app);
            } else {
                commit_title(app);
            }
        }
        // Moving focus away from a title commits it
        (_, KeyCode::Up) | (_, KeyCode::Down) if matches!(app.mode, Mode::Edit { .. }) => {
            commit_title(app);
            app.move_cursor(if key.code == KeyCode::Up { -1 } else { 1 });
        }

        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => app.edit_cursor = 0,
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = app.edit_buffer.len();
        }
        (_, KeyCode::Home) => app.edit_cursor = 0,
        (_, KeyCode::End) => app.edit_cursor = app.edit_buffer.len(),
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_buffer.drain(..app.edit_cursor);
            app.edit_cursor = 0;
        }
        (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => {
            let start = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.drain(start..app.edit_cursor);
            app.edit_cursor = start;
        }
        (m, KeyCode::Backspace) if m.contains(KeyModifiers::ALT) => {
            let start = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.drain(start..app.edit_cursor);
            app.edit_cursor = start;
        }
        (m, KeyCode::Left) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
        }
        (m, KeyCode::Right) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_right(&app.edit_buffer, app.edit_cursor);
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = next;
            }
        }
        (_, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(prev..app.edit_cursor);
                app.edit_cursor = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(app.edit_cursor..next);
            }
        }
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn commit_add<S: Storage>(app: &mut App<S>) {
    let title = std::mem::take(&mut app.edit_buffer);
    app.apply(Edit::Add { title });
    finish(app);
}

/// Commit the edited title. An emptied title deletes the task.
fn commit_title<S: Storage>(app: &mut App<S>) {
    let Mode::Edit { id } = std::mem::replace(&mut app.mode, Mode::Navigate) else {
        return;
    };
    let title = std::mem::take(&mut app.edit_buffer);
    app.apply(Edit::Rename { id, title });
    finish(app);
}

fn finish<S: Storage>(app: &mut App<S>) {
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.mode = Mode::Navigate;
}
