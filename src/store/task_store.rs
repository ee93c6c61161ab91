use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::io::debounce::Debouncer;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, Reporter};
use crate::io::storage::Storage;
use crate::model::task::TaskCollection;
use crate::ops::task_ops::{self, Edit};

/// The live task list: the current snapshot plus at most one pending save.
///
/// Every effective edit swaps in a new `Arc` snapshot, so what is drawn and
/// what is waiting to be written are always complete, unshared values.
pub struct TaskStore {
    current: Arc<TaskCollection>,
    pending_save: Debouncer<Arc<TaskCollection>>,
    needs_render: bool,
    reporter: Reporter,
}

impl TaskStore {
    pub fn new(initial: TaskCollection, save_delay: Duration, reporter: Reporter) -> Self {
        TaskStore {
            current: Arc::new(initial),
            pending_save: Debouncer::new(save_delay),
            needs_render: true,
            reporter,
        }
    }

    /// Load the persisted list, falling back to an empty one on failure.
    pub fn load(storage: &dyn Storage, save_delay: Duration, mut reporter: Reporter) -> Self {
        let initial = match storage.read_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                reporter.report(
                    RecoveryEntry::new(
                        RecoveryCategory::Load,
                        "could not load tasks, starting empty",
                    )
                    .field("Error", e.to_string()),
                );
                TaskCollection::empty()
            }
        };
        TaskStore::new(initial, save_delay, reporter)
    }

    pub fn snapshot(&self) -> Arc<TaskCollection> {
        Arc::clone(&self.current)
    }

    pub fn tasks(&self) -> &TaskCollection {
        &self.current
    }

    /// Apply an edit. Returns true when the list changed, in which case a
    /// save is (re)scheduled from `at` and a redraw is requested.
    pub fn apply(&mut self, edit: &Edit, now: i64, now_millis: i64, at: Instant) -> bool {
        let Some(next) = task_ops::apply_edit(&self.current, edit, now, now_millis) else {
            return false;
        };
        self.current = Arc::new(next);
        self.pending_save.schedule(Arc::clone(&self.current), at);
        self.needs_render = true;
        true
    }

    /// `apply` stamped with the wall clock.
    pub fn apply_now(&mut self, edit: &Edit) -> bool {
        let now = chrono::Utc::now();
        self.apply(edit, now.timestamp(), now.timestamp_millis(), Instant::now())
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending_save.deadline()
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_pending()
    }

    /// Write the pending snapshot if its quiet period is over.
    pub fn tick(&mut self, at: Instant, storage: &dyn Storage) {
        if let Some(snapshot) = self.pending_save.poll(at) {
            self.write(&snapshot, storage);
        }
    }

    /// Write the pending snapshot now.
    pub fn flush(&mut self, storage: &dyn Storage) {
        if let Some(snapshot) = self.pending_save.take() {
            self.write(&snapshot, storage);
        }
    }

    /// Clear and return the redraw request.
    pub fn take_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.reporter.take_notice()
    }

    fn write(&mut self, snapshot: &TaskCollection, storage: &dyn Storage) {
        if let Err(e) = storage.write_tasks(snapshot) {
            let body = serde_json::to_string_pretty(snapshot).unwrap_or_default();
            self.reporter.report(
                RecoveryEntry::new(RecoveryCategory::Save, "could not save tasks")
                    .field("Error", e.to_string())
                    .field("Tasks", snapshot.len().to_string())
                    .body(body),
            );
        }
    }
}
