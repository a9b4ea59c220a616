//! Storage traits and error types

use crate::storage::TaskRecord;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the crawl engine's durable collaborators.
///
/// All operations are keyed by task id, so concurrent workers driving
/// different tasks never interfere with each other's records.
pub trait CrawlStore {
    // ===== Task rows =====

    /// Persists a newly created task in `active` status.
    fn create_task(
        &mut self,
        id: &str,
        keyword: &str,
        origin: &str,
        started_at: DateTime<Utc>,
    ) -> StorageResult<()>;

    /// Gets a task row by id.
    fn get_task(&self, id: &str) -> StorageResult<Option<TaskRecord>>;

    /// Marks a task `done` and freezes its end time and final counters.
    /// Called exactly once per task, by the lifecycle coordinator.
    fn finalize_task(
        &mut self,
        id: &str,
        finished_at: DateTime<Utc>,
        pages_visited: u64,
        urls_found: u64,
    ) -> StorageResult<()>;

    /// Lists tasks still marked `active` (e.g. leftovers from a previous
    /// process that died mid-crawl).
    fn list_active_tasks(&self) -> StorageResult<Vec<TaskRecord>>;

    // ===== Durable dedup =====

    /// Checks whether a URL was already visited within this task, across
    /// process restarts.
    fn is_visited(&self, task_id: &str, url: &str) -> StorageResult<bool>;

    /// Records a visited URL. Idempotent per (task, url).
    fn record_visited(&mut self, task_id: &str, url: &str) -> StorageResult<()>;

    /// Counts visited URLs for a task.
    fn count_visited(&self, task_id: &str) -> StorageResult<u64>;

    // ===== Durable results =====

    /// Records a URL where the keyword matched. Idempotent per (task, url).
    fn record_found(&mut self, task_id: &str, url: &str) -> StorageResult<()>;

    /// Lists found URLs for a task in discovery order.
    fn list_found(&self, task_id: &str) -> StorageResult<Vec<String>>;

    /// Counts found URLs for a task.
    fn count_found(&self, task_id: &str) -> StorageResult<u64>;
}
