//! Storage module for persisting crawl data
//!
//! Durable collaborators of the crawl engine live here: the per-task visited
//! record (dedup that survives the in-memory task), the ordered found-URL
//! record, and the task rows that result queries fall back to once a crawl
//! is finalized and evicted from the live registry.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CrawlStore, StorageError, StorageResult};

use crate::task::TaskStatus;

/// Durable row for one crawl task.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: String,
    pub keyword: String,
    pub origin: String,
    pub status: TaskStatus,
    pub started_at: String,
    pub finished_at: Option<String>,
    /// Final counters, written at finalization; zero while the task is
    /// active (live counts come from the in-memory task).
    pub pages_visited: u64,
    pub urls_found: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_record_status_roundtrip() {
        for status in [TaskStatus::Active, TaskStatus::Done] {
            let parsed = TaskStatus::from_db_string(status.as_str());
            assert_eq!(Some(status), parsed);
        }
    }
}
