use rand::Rng;

use crate::model::task::{Task, TaskCollection};

/// Error type for task lookups by id
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("ambiguous task id: {0}")]
    Ambiguous(String),
}

/// A user edit against the current snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Add { title: String },
    Rename { id: String, title: String },
    Complete { id: String },
    Remove { id: String },
}

/// Apply an edit, returning the new snapshot or `None` when nothing changed.
///
/// `now` is seconds since epoch; `now_millis` seeds the id of an added task.
pub fn apply_edit(
    coll: &TaskCollection,
    edit: &Edit,
    now: i64,
    now_millis: i64,
) -> Option<TaskCollection> {
    match edit {
        Edit::Add { title } => add_task(coll, title, new_task_id(now_millis), now),
        Edit::Rename { id, title } => rename_task(coll, id, title, now),
        Edit::Complete { id } => complete_task(coll, id, now),
        Edit::Remove { id } => remove_task(coll, id, now),
    }
}

// ---------------------------------------------------------------------------
// Snapshot operations
// ---------------------------------------------------------------------------

/// Append a new task. Blank titles are a no-op.
pub fn add_task(
    coll: &TaskCollection,
    title: &str,
    id: String,
    now: i64,
) -> Option<TaskCollection> {
    let title = normalize_title(title)?;
    let mut todos = coll.todos.clone();
    todos.push(Task::new(id, title.to_string(), now));
    Some(TaskCollection {
        todos,
        updated_at: now,
    })
}

/// Change a task's title. A blank title removes the task.
pub fn rename_task(
    coll: &TaskCollection,
    id: &str,
    new_title: &str,
    now: i64,
) -> Option<TaskCollection> {
    let Some(title) = normalize_title(new_title) else {
        return remove_task(coll, id, now);
    };
    let current = coll.find(id)?;
    if current.title == title {
        return None;
    }
    let todos = coll
        .todos
        .iter()
        .map(|t| {
            if t.id == id {
                Task {
                    title: title.to_string(),
                    updated_at: now,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect();
    Some(TaskCollection {
        todos,
        updated_at: now,
    })
}

/// Mark a task completed. Completion is one-way; repeating it is a no-op.
pub fn complete_task(coll: &TaskCollection, id: &str, now: i64) -> Option<TaskCollection> {
    let current = coll.find(id)?;
    if current.completed {
        return None;
    }
    let todos = coll
        .todos
        .iter()
        .map(|t| {
            if t.id == id {
                Task {
                    completed: true,
                    completed_at: Some(now),
                    updated_at: now,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect();
    Some(TaskCollection {
        todos,
        updated_at: now,
    })
}

/// Drop a task from the list.
pub fn remove_task(coll: &TaskCollection, id: &str, now: i64) -> Option<TaskCollection> {
    coll.find(id)?;
    let todos = coll.todos.iter().filter(|t| t.id != id).cloned().collect();
    Some(TaskCollection {
        todos,
        updated_at: now,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim a title; `None` if nothing is left.
pub fn normalize_title(title: &str) -> Option<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `<millis>-<7 base-36 chars>`: unique enough for a single-user list.
pub fn new_task_id(now_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", now_millis, suffix)
}

/// Resolve a full id or unique prefix to the stored id.
pub fn resolve_task_id(coll: &TaskCollection, needle: &str) -> Result<String, TaskError> {
    if let Some(id) = coll.resolve_id(needle) {
        return Ok(id.to_string());
    }
    if coll.todos.iter().any(|t| t.id.starts_with(needle)) {
        Err(TaskError::Ambiguous(needle.to_string()))
    } else {
        Err(TaskError::NotFound(needle.to_string()))
    }
}
