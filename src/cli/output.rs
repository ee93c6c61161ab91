use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::task::Task;
use crate::model::window::WindowGeometry;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub added: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<String>,
}

#[derive(Serialize)]
pub struct RemovedJson {
    pub removed: String,
}

#[derive(Serialize)]
pub struct WindowJson {
    /// False when nothing has been saved and the configured default is shown
    pub saved: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn rfc3339(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        completed: task.completed,
        created_at: task.created_at,
        updated_at: task.updated_at,
        completed_at: task.completed_at,
        added: rfc3339(task.added_at()),
        done: task.completed_at.filter(|&t| t > 0).map(rfc3339),
    }
}

pub fn window_to_json(geometry: &WindowGeometry, saved: bool) -> WindowJson {
    WindowJson {
        saved,
        x: geometry.x,
        y: geometry.y,
        width: geometry.width,
        height: geometry.height,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line summary: `[x] <id> <title>`
pub fn format_task_line(task: &Task) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    format!("[{}] {} {}", check, task.id, task.title)
}

pub fn format_window(geometry: &WindowGeometry, saved: bool) -> String {
    let line = format!(
        "{}x{} at {},{}",
        geometry.width, geometry.height, geometry.x, geometry.y
    );
    if saved {
        line
    } else {
        format!("{} (default, nothing saved yet)", line)
    }
}
