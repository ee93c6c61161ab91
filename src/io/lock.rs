use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Name of the lock file inside the data directory
pub const LOCK_FILE: &str = ".lock";

/// Held by the running terminal UI
pub const INSTANCE_FILE: &str = ".instance";

/// Advisory lock held around every write into the data directory, so the
/// terminal UI and CLI invocations never interleave their writes.
pub struct WriteLock {
    _file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out waiting for {}: another pintask process is writing", .path.display())]
    Timeout { path: PathBuf },
    #[error("pt is already running")]
    AlreadyRunning { path: PathBuf },
}

impl WriteLock {
    /// Acquire the lock, retrying for up to `timeout`.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Create {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        while try_lock(&file).is_err() {
            if start.elapsed() >= timeout {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(WriteLock { _file: file, path })
    }

    /// Acquire with the default two second timeout.
    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(2))
    }
}

/// Held for the lifetime of a terminal UI, so two of them never edit the
/// same data directory from separate snapshots.
pub struct InstanceLock {
    _file: File,
}

impl InstanceLock {
    /// Take the instance lock without waiting.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        let path = data_dir.join(INSTANCE_FILE);
        let create = |source| LockError::Create {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(data_dir).map_err(create)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(create)?;
        // Never removed, so every process locks the same inode
        if try_lock(&file).is_err() {
            return Err(LockError::AlreadyRunning { path });
        }
        Ok(InstanceLock { _file: file })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        // flock is released with the descriptor
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
