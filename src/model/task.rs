use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque id, assigned once at creation
    pub id: String,
    /// Trimmed, never empty
    pub title: String,
    pub completed: bool,
    /// Seconds since epoch of the task's own last mutation
    #[serde(default)]
    pub updated_at: i64,
    /// Seconds since epoch, set once at creation
    #[serde(default)]
    pub created_at: i64,
    /// Seconds since epoch, set once when the task is completed
    #[serde(default)]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Create a fresh, uncompleted task stamped at `now`.
    pub fn new(id: String, title: String, now: i64) -> Self {
        Task {
            id,
            title,
            completed: false,
            updated_at: now,
            created_at: now,
            completed_at: None,
        }
    }

    /// Creation stamp for display. Records written before `created_at`
    /// existed fall back to `updated_at`.
    pub fn added_at(&self) -> i64 {
        if self.created_at != 0 {
            self.created_at
        } else {
            self.updated_at
        }
    }
}

/// An immutable snapshot of the whole list, in display order.
///
/// Edits never touch a snapshot in place; `ops::task_ops` builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCollection {
    pub todos: Vec<Task>,
    /// Seconds since epoch of the collection's own last mutation
    #[serde(default)]
    pub updated_at: i64,
}

impl TaskCollection {
    pub fn empty() -> Self {
        TaskCollection::default()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Backfill `created_at` on records that predate it.
    pub fn backfill_created_at(&mut self) {
        for task in &mut self.todos {
            if task.created_at == 0 && task.updated_at != 0 {
                task.created_at = task.updated_at;
            }
        }
    }

    /// Resolve a full id or an unambiguous id prefix.
    pub fn resolve_id(&self, needle: &str) -> Option<&str> {
        if let Some(task) = self.find(needle) {
            return Some(&task.id);
        }
        let mut matches = self.todos.iter().filter(|t| t.id.starts_with(needle));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(&first.id)
    }
}
