//! SQLite implementation of the crawl store

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CrawlStore, StorageResult};
use crate::storage::TaskRecord;
use crate::task::TaskStatus;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed crawl store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing).
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRecord> {
        Ok(TaskRecord {
            id: row.get(0)?,
            keyword: row.get(1)?,
            origin: row.get(2)?,
            status: TaskStatus::from_db_string(&row.get::<_, String>(3)?)
                .unwrap_or(TaskStatus::Done),
            started_at: row.get(4)?,
            finished_at: row.get(5)?,
            pages_visited: row.get(6)?,
            urls_found: row.get(7)?,
        })
    }
}

const TASK_COLUMNS: &str =
    "id, keyword, origin, status, started_at, finished_at, pages_visited, urls_found";

impl CrawlStore for SqliteStore {
    fn create_task(
        &mut self,
        id: &str,
        keyword: &str,
        origin: &str,
        started_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, keyword, origin, status, started_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                keyword,
                origin,
                TaskStatus::Active.as_str(),
                started_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn get_task(&self, id: &str) -> StorageResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS))?;
        let task = stmt.query_row(params![id], Self::row_to_task).optional()?;
        Ok(task)
    }

    fn finalize_task(
        &mut self,
        id: &str,
        finished_at: DateTime<Utc>,
        pages_visited: u64,
        urls_found: u64,
    ) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE tasks SET status = ?1, finished_at = ?2, pages_visited = ?3, urls_found = ?4
             WHERE id = ?5",
            params![
                TaskStatus::Done.as_str(),
                finished_at.to_rfc3339(),
                pages_visited,
                urls_found,
                id
            ],
        )?;
        Ok(())
    }

    fn list_active_tasks(&self) -> StorageResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE status = ?1 ORDER BY started_at",
            TASK_COLUMNS
        ))?;
        let tasks = stmt
            .query_map(params![TaskStatus::Active.as_str()], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn is_visited(&self, task_id: &str, url: &str) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM visited_urls WHERE task_id = ?1 AND url = ?2",
            params![task_id, url],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn record_visited(&mut self, task_id: &str, url: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO visited_urls (task_id, url, visited_at) VALUES (?1, ?2, ?3)",
            params![task_id, url, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn count_visited(&self, task_id: &str) -> StorageResult<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM visited_urls WHERE task_id = ?1",
            params![task_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn record_found(&mut self, task_id: &str, url: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO found_urls (task_id, url, found_at) VALUES (?1, ?2, ?3)",
            params![task_id, url, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn list_found(&self, task_id: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM found_urls WHERE task_id = ?1 ORDER BY id")?;
        let urls = stmt
            .query_map(params![task_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }

    fn count_found(&self, task_id: &str) -> StorageResult<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM found_urls WHERE task_id = ?1",
            params![task_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
