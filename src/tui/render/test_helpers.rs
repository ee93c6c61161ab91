use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::recovery::Reporter;
use crate::io::storage::memory::MemoryStorage;
use crate::model::config::AppConfig;
use crate::model::task::{Task, TaskCollection};
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over in-memory storage holding one open task per title, with
/// ids `id-0`, `id-1`, ...
pub fn app_with(titles: &[&str]) -> App<MemoryStorage> {
    let storage = MemoryStorage::default();
    let now = chrono::Utc::now().timestamp();
    let todos = titles
        .iter()
        .enumerate()
        .map(|(i, t)| Task::new(format!("id-{i}"), t.to_string(), now))
        .collect();
    *storage.tasks.borrow_mut() = Some(TaskCollection {
        todos,
        updated_at: now,
    });
    App::new(storage, &AppConfig::default(), Reporter::detached())
}

/// Titles in display order
pub fn titles(app: &App<MemoryStorage>) -> Vec<String> {
    app.store
        .tasks()
        .todos
        .iter()
        .map(|t| t.title.clone())
        .collect()
}
