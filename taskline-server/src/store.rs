//! Task persistence: swappable snapshot backends behind a single-writer
//! store.
//!
//! A [`StoreBackend`] loads and saves whole-list snapshots; the flat-file
//! backend is the production one, the in-memory backend serves tests and
//! embedding. [`TaskStore`] wraps a backend and funnels every
//! read-modify-write through one async mutex, so concurrent API requests
//! apply in sequence instead of overwriting each other's snapshot.

use std::path::PathBuf;

use async_trait::async_trait;
use taskline_proto::record;
use taskline_proto::task::Task;
use tokio::sync::{Mutex, RwLock};

/// Errors that can occur while loading or saving a task snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read the snapshot file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the snapshot file.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// A whole-snapshot storage backend.
///
/// Every operation reads or replaces the entire task list; there are no
/// partial or append updates.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Loads the full task list.
    async fn load(&self) -> Result<Vec<Task>, StoreError>;

    /// Replaces the stored task list with `tasks`.
    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// Flat-file backend: the task list as pipe-delimited lines in one file.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend reading and writing the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StoreBackend for FileBackend {
    /// Loads the snapshot file. A missing file reads as an empty list (no
    /// tasks yet); malformed lines are skipped with a warning.
    async fn load(&self) -> Result<Vec<Task>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let mut tasks = Vec::new();
        for (line, parsed) in record::decode_snapshot(&content) {
            match parsed {
                Ok(task) => tasks.push(task),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line,
                    error = %e,
                    "skipping malformed record line"
                ),
            }
        }
        Ok(tasks)
    }

    /// Overwrites the snapshot file in place.
    ///
    /// There is no temp-file swap: a crash mid-write can leave the file
    /// truncated. Known limitation of the snapshot format.
    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        tokio::fs::write(&self.path, record::encode_snapshot(tasks))
            .await
            .map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })
    }
}

/// In-memory backend holding the task list behind an [`RwLock`].
#[derive(Default)]
pub struct MemoryBackend {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn load(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        *self.tasks.write().await = tasks.to_vec();
        Ok(())
    }
}

/// Task store shared across request handlers.
///
/// Reads go straight to the backend; mutations serialize through a single
/// lock held across the whole load-mutate-save cycle.
pub struct TaskStore {
    backend: Box<dyn StoreBackend>,
    write_lock: Mutex<()>,
}

impl TaskStore {
    /// Creates a store over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn StoreBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Convenience constructor for the flat-file backend.
    #[must_use]
    pub fn flat_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileBackend::new(path)))
    }

    /// Convenience constructor for the in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Returns the current task list without taking the mutation lock.
    ///
    /// An unreadable snapshot reads as an empty list; the fault is logged
    /// rather than surfaced.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.load_or_empty().await
    }

    /// Applies a mutation under the single-writer lock and saves the
    /// result.
    ///
    /// The current snapshot is loaded, `f` runs against it, and the mutated
    /// list is written back before the lock is released, so concurrent
    /// mutations apply in sequence and none is lost.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the mutated snapshot cannot be saved.
    pub async fn mutate<T: Send>(
        &self,
        f: impl FnOnce(&mut Vec<Task>) -> T + Send,
    ) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load_or_empty().await;
        let out = f(&mut tasks);
        self.backend.save(&tasks).await?;
        Ok(out)
    }

    /// Like [`Self::mutate`], but saves only when the closure reports a
    /// change by returning `Some`; on `None` the snapshot is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the mutated snapshot cannot be saved.
    pub async fn try_mutate<T: Send>(
        &self,
        f: impl FnOnce(&mut Vec<Task>) -> Option<T> + Send,
    ) -> Result<Option<T>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load_or_empty().await;
        match f(&mut tasks) {
            Some(out) => {
                self.backend.save(&tasks).await?;
                Ok(Some(out))
            }
            None => Ok(None),
        }
    }

    async fn load_or_empty(&self) -> Vec<Task> {
        match self.backend.load().await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot load failed, treating as empty");
                Vec::new()
            }
        }
    }
}
