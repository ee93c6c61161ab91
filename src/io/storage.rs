use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::task::TaskCollection;
use crate::model::window::WindowGeometry;

use super::lock::{LockError, WriteLock};
use super::recovery::atomic_write;

pub const TASKS_FILE: &str = "todos.json";
pub const WINDOW_STATE_FILE: &str = "window_state.json";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "PINTASK_DIR";

/// Which persisted record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Tasks,
    WindowState,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Tasks => write!(f, "tasks"),
            Record::WindowState => write!(f, "window state"),
        }
    }
}

/// Underlying reason a load or save failed
#[derive(Debug, thiserror::Error)]
pub enum StorageCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not load {record} from {}: {source}", .path.display())]
    LoadFailure {
        record: Record,
        path: PathBuf,
        #[source]
        source: StorageCause,
    },
    #[error("could not save {record} to {}: {source}", .path.display())]
    SaveFailure {
        record: Record,
        path: PathBuf,
        #[source]
        source: StorageCause,
    },
}

impl StorageError {
    fn load(record: Record, path: &Path, source: impl Into<StorageCause>) -> Self {
        StorageError::LoadFailure {
            record,
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    fn save(record: Record, path: &Path, source: impl Into<StorageCause>) -> Self {
        StorageError::SaveFailure {
            record,
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn record(&self) -> Record {
        match self {
            StorageError::LoadFailure { record, .. } | StorageError::SaveFailure { record, .. } => {
                *record
            }
        }
    }
}

/// Durable home of the task list and window placement.
pub trait Storage {
    /// A missing record is an empty list, not an error.
    fn read_tasks(&self) -> Result<TaskCollection, StorageError>;
    fn write_tasks(&self, tasks: &TaskCollection) -> Result<(), StorageError>;
    /// `Ok(None)` when no placement has been saved yet.
    fn read_window_state(&self) -> Result<Option<WindowGeometry>, StorageError>;
    fn write_window_state(&self, state: &WindowGeometry) -> Result<(), StorageError>;
}

/// Pretty-printed JSON files in a data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE)
    }

    pub fn window_state_path(&self) -> PathBuf {
        self.dir.join(WINDOW_STATE_FILE)
    }

    fn write_json<T: serde::Serialize>(
        &self,
        record: Record,
        path: &Path,
        value: &T,
    ) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::save(record, path, e))?;
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::save(record, path, e))?;
        let _lock = WriteLock::acquire_default(&self.dir)
            .map_err(|e| StorageError::save(record, path, e))?;
        atomic_write(path, text.as_bytes()).map_err(|e| StorageError::save(record, path, e))
    }
}

impl Storage for JsonStorage {
    fn read_tasks(&self) -> Result<TaskCollection, StorageError> {
        let path = self.tasks_path();
        if !path.exists() {
            return Ok(TaskCollection::empty());
        }
        let text =
            fs::read_to_string(&path).map_err(|e| StorageError::load(Record::Tasks, &path, e))?;
        let mut tasks: TaskCollection =
            serde_json::from_str(&text).map_err(|e| StorageError::load(Record::Tasks, &path, e))?;
        tasks.backfill_created_at();
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &TaskCollection) -> Result<(), StorageError> {
        self.write_json(Record::Tasks, &self.tasks_path(), tasks)
    }

    fn read_window_state(&self) -> Result<Option<WindowGeometry>, StorageError> {
        let path = self.window_state_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| StorageError::load(Record::WindowState, &path, e))?;
        let state = serde_json::from_str(&text)
            .map_err(|e| StorageError::load(Record::WindowState, &path, e))?;
        Ok(Some(state))
    }

    fn write_window_state(&self, state: &WindowGeometry) -> Result<(), StorageError> {
        self.write_json(Record::WindowState, &self.window_state_path(), state)
    }
}

/// Resolve the data directory: explicit flag, then `$PINTASK_DIR`, then the
/// platform data directory.
pub fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join("pintask"))
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no data directory available",
            )
        })
}

/// In-memory storage with switchable failures, for tests.
#[cfg(test)]
pub(crate) mod memory {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Default)]
    pub struct MemoryStorage {
        pub tasks: RefCell<Option<TaskCollection>>,
        pub window: RefCell<Option<WindowGeometry>>,
        pub task_writes: RefCell<Vec<TaskCollection>>,
        pub window_writes: RefCell<Vec<WindowGeometry>>,
        pub fail_reads: Cell<bool>,
        pub fail_writes: Cell<bool>,
    }

    impl MemoryStorage {
        fn failure() -> StorageCause {
            StorageCause::Io(std::io::Error::other("simulated failure"))
        }
    }

    impl Storage for MemoryStorage {
        fn read_tasks(&self) -> Result<TaskCollection, StorageError> {
            if self.fail_reads.get() {
                return Err(StorageError::load(Record::Tasks, Path::new("memory"), Self::failure()));
            }
            Ok(self.tasks.borrow().clone().unwrap_or_default())
        }

        fn write_tasks(&self, tasks: &TaskCollection) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::save(Record::Tasks, Path::new("memory"), Self::failure()));
            }
            self.task_writes.borrow_mut().push(tasks.clone());
            *self.tasks.borrow_mut() = Some(tasks.clone());
            Ok(())
        }

        fn read_window_state(&self) -> Result<Option<WindowGeometry>, StorageError> {
            if self.fail_reads.get() {
                return Err(StorageError::load(
                    Record::WindowState,
                    Path::new("memory"),
                    Self::failure(),
                ));
            }
            Ok(*self.window.borrow())
        }

        fn write_window_state(&self, state: &WindowGeometry) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::save(
                    Record::WindowState,
                    Path::new("memory"),
                    Self::failure(),
                ));
            }
            self.window_writes.borrow_mut().push(*state);
            *self.window.borrow_mut() = Some(*state);
            Ok(())
        }
    }
}
