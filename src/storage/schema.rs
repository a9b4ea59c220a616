//! Database schema definitions

/// SQL schema for the keyseek database
pub const SCHEMA_SQL: &str = r#"
-- One row per crawl task
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    keyword TEXT NOT NULL,
    origin TEXT NOT NULL,
    status TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    pages_visited INTEGER NOT NULL DEFAULT 0,
    urls_found INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);

-- Visited URLs per task; survives the in-memory task for cross-restart dedup
CREATE TABLE IF NOT EXISTS visited_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(id),
    url TEXT NOT NULL,
    visited_at TEXT NOT NULL,
    UNIQUE(task_id, url)
);

CREATE INDEX IF NOT EXISTS idx_visited_task ON visited_urls(task_id);

-- URLs where the keyword matched; rowid order is discovery order
CREATE TABLE IF NOT EXISTS found_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id TEXT NOT NULL REFERENCES tasks(id),
    url TEXT NOT NULL,
    found_at TEXT NOT NULL,
    UNIQUE(task_id, url)
);

CREATE INDEX IF NOT EXISTS idx_found_task ON found_urls(task_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["tasks", "visited_urls", "found_urls"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
