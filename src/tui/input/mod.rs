mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::storage::Storage;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Any key brings a hidden or minimized window back, and does nothing else
    if app.window_concealed() {
        app.window.show();
        app.mode = Mode::Navigate;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Add | Mode::Edit { .. } => edit::handle_edit(app, key),
        Mode::Snap => navigate::handle_snap(app, key),
    }
}

/// Insert pasted text into the active input line. Newlines become spaces.
pub fn handle_paste<S: Storage>(app: &mut App<S>, text: &str) {
    if !matches!(app.mode, Mode::Add | Mode::Edit { .. }) || text.is_empty() {
        return;
    }
    let clean = text.replace(['\r', '\n'], " ");
    app.edit_buffer.insert_str(app.edit_cursor, &clean);
    app.edit_cursor += clean.len();
}

/// Shifted letters arrive as uppercase with SHIFT set on some terminals and
/// lowercase with SHIFT on others; fold both to uppercase.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}
