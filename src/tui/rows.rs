use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::model::task::{Task, TaskCollection};
use crate::ops::task_ops::Edit;
use crate::util::datefmt::format_timestamp;

/// What the list shows for one task, plus the edits its controls produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub meta: String,
}

impl TaskRow {
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }

    /// Activating the checkbox. Completion is one-way.
    pub fn toggle(&self) -> Option<Edit> {
        (!self.completed).then(|| Edit::Complete {
            id: self.id.clone(),
        })
    }

    /// Leaving the title field with `text` in it.
    pub fn commit(&self, text: &str) -> Edit {
        Edit::Rename {
            id: self.id.clone(),
            title: text.to_string(),
        }
    }

    pub fn delete(&self) -> Edit {
        Edit::Remove {
            id: self.id.clone(),
        }
    }
}

/// One row per task, in collection order.
pub fn rows<Tz>(tasks: &TaskCollection, now: &DateTime<Tz>) -> Vec<TaskRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tasks
        .todos
        .iter()
        .map(|task| TaskRow {
            id: task.id.clone(),
            title: task.title.clone(),
            completed: task.completed,
            meta: meta_line(task, now),
        })
        .collect()
}

/// `Added <when>`, followed by ` · Done <when>` once completed.
pub fn meta_line<Tz>(task: &Task, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut line = format!("Added {}", format_timestamp(task.added_at(), now));
    if let Some(done) = task.completed_at
        && done > 0
    {
        line.push_str(" \u{00B7} Done ");
        line.push_str(&format_timestamp(done, now));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap()
    }

    fn at(h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap().timestamp()
    }

    fn collection() -> TaskCollection {
        let mut done = Task::new("t-1".into(), "File taxes".into(), at(9, 5));
        done.completed = true;
        done.completed_at = Some(at(14, 30));
        let open = Task::new("t-2".into(), "Buy milk".into(), at(10, 0));
        TaskCollection {
            todos: vec![done, open],
            updated_at: at(14, 30),
        }
    }

    #[test]
    fn one_row_per_task_in_order() {
        let rows = rows(&collection(), &now());
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t-1", "t-2"]);
        assert_eq!(rows[0].checkbox(), "[x]");
        assert_eq!(rows[1].checkbox(), "[ ]");
    }

    #[test]
    fn meta_lines() {
        let rows = rows(&collection(), &now());
        insta::assert_snapshot!(rows[0].meta, @"Added Today 9:05 AM · Done Today 2:30 PM");
        insta::assert_snapshot!(rows[1].meta, @"Added Today 10:00 AM");
    }

    #[test]
    fn legacy_task_uses_updated_at() {
        let mut task = Task::new("t-3".into(), "Old".into(), 0);
        task.updated_at = at(8, 0);
        assert_eq!(meta_line(&task, &now()), "Added Today 8:00 AM");
    }

    #[test]
    fn zero_completed_at_is_not_shown() {
        let mut task = Task::new("t-4".into(), "Odd".into(), at(8, 0));
        task.completed = true;
        task.completed_at = Some(0);
        assert_eq!(meta_line(&task, &now()), "Added Today 8:00 AM");
    }

    #[test]
    fn toggle_only_completes_open_tasks() {
        let rows = rows(&collection(), &now());
        assert_eq!(rows[0].toggle(), None);
        assert_eq!(rows[1].toggle(), Some(Edit::Complete { id: "t-2".into() }));
    }

    #[test]
    fn commit_and_delete_target_the_row() {
        let rows = rows(&collection(), &now());
        assert_eq!(
            rows[1].commit("Buy oat milk"),
            Edit::Rename {
                id: "t-2".into(),
                title: "Buy oat milk".into()
            }
        );
        assert_eq!(rows[0].delete(), Edit::Remove { id: "t-1".into() });
    }
}
