use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Task;

/// Where a [`TaskManager`](crate::manager::TaskManager) loads its tasks from
/// and hands them back to on exit.
pub trait Storage {
    /// Loads every stored task, in id order. An empty store yields an empty list.
    fn load_tasks(&self) -> Result<Vec<Task>>;

    /// Replaces the stored tasks with `tasks`.
    fn save_tasks(&self, tasks: &[Task]) -> Result<()>;
}

/// Returns the default path of the tasks database file (`tasks.json`).
///
/// The path is determined in the following order:
/// 1. `NOTIFY_DB` environment variable (read by the CLI's `--db` flag).
/// 2. `~/.local/share/notify/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
pub fn default_db_path() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("notify");
    p.push("tasks.json");
    p
}

/// Tasks stored as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStorage { path: path.into() }
    }
}

impl Storage for JsonStorage {
    /// Returns an empty vector if the file does not exist yet. Tasks without
    /// a name, or dated tasks without dates, make the whole file invalid.
    fn load_tasks(&self) -> Result<Vec<Task>> {
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task database yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks: Vec<Task> = serde_json::from_str(&s).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;
        if let Some(bad) = tasks.iter().find(|t| !t.is_valid()) {
            return Err(Error::InvalidTask {
                path: self.path.clone(),
                id: bad.id,
            });
        }
        info!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Overwrites the existing file, creating its directory when needed.
    fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let s = serde_json::to_string_pretty(tasks).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        info!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Keeps tasks in memory only. Saved lists can be read back with [`MemoryStorage::saved`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tasks: RefCell<Vec<Task>>,
}

impl MemoryStorage {
    pub fn new(tasks: Vec<Task>) -> Self {
        MemoryStorage {
            tasks: RefCell::new(tasks),
        }
    }

    /// The list handed over by the last save (or the initial list).
    pub fn saved(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}
