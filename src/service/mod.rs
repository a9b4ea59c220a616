//! Crawl service: the start/query surface over the engine
//!
//! The service validates incoming crawl requests, creates tasks, dispatches
//! them for asynchronous execution, and answers result queries. Results are
//! two-tiered: while a crawl is running its live task serves progressive
//! results from memory; once finalized and evicted, queries fall back to the
//! durable store.

use crate::storage::CrawlStore;
use crate::task::{generate_task_id, CrawlTask, TaskRegistry};
use crate::{KeyseekError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use url::Url;

/// Minimum keyword length accepted by [`CrawlService::start_crawl`].
pub const KEYWORD_MIN_LEN: usize = 4;
/// Maximum keyword length accepted by [`CrawlService::start_crawl`].
pub const KEYWORD_MAX_LEN: usize = 32;

/// Dispatched crawl payload: a fixed, versioned structure rather than a
/// serialized live object, so the wire format stays decoupled from the
/// in-process task representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    pub version: u32,
    pub id: String,
    pub keyword: String,
    pub origin: String,
}

impl CrawlJob {
    pub const VERSION: u32 = 1;

    pub fn new(
        id: impl Into<String>,
        keyword: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            version: Self::VERSION,
            id: id.into(),
            keyword: keyword.into(),
            origin: origin.into(),
        }
    }
}

/// Result of a crawl query: progressive while active, final once done.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub id: String,
    pub status: String,
    pub urls: Vec<String>,
}

/// Service coordinating crawl creation, dispatch, and result queries.
pub struct CrawlService<S: CrawlStore> {
    registry: Arc<TaskRegistry>,
    store: Arc<Mutex<S>>,
    jobs: mpsc::UnboundedSender<CrawlJob>,
}

impl<S: CrawlStore> CrawlService<S> {
    pub fn new(
        registry: Arc<TaskRegistry>,
        store: Arc<Mutex<S>>,
        jobs: mpsc::UnboundedSender<CrawlJob>,
    ) -> Self {
        Self {
            registry,
            store,
            jobs,
        }
    }

    /// Starts a new crawl for `keyword` rooted at `origin`.
    ///
    /// Validates the keyword length (4-32 characters) and the origin (an
    /// absolute http/https URL), persists the task, registers it for live
    /// queries, and hands the job to the dispatch channel. Returns the new
    /// task id.
    pub fn start_crawl(&self, keyword: &str, origin: &str) -> Result<String> {
        let len = keyword.chars().count();
        if !(KEYWORD_MIN_LEN..=KEYWORD_MAX_LEN).contains(&len) {
            return Err(KeyseekError::InvalidKeyword { got: len });
        }
        validate_origin(origin)?;

        let id = generate_task_id();
        let task = Arc::new(CrawlTask::new(id.as_str(), keyword, origin));

        {
            let mut store = self.store.lock().unwrap();
            store.create_task(&id, keyword, origin, task.started_at())?;
        }
        self.registry.insert(task);

        self.jobs
            .send(CrawlJob::new(id.as_str(), keyword, origin))
            .map_err(|_| KeyseekError::DispatchClosed)?;

        tracing::info!("Started crawl {} for keyword '{}' at {}", id, keyword, origin);
        Ok(id)
    }

    /// Looks up crawl results by task id.
    ///
    /// Live tasks answer from memory with results found so far; finished
    /// tasks answer from durable storage. Returns `Ok(None)` for unknown
    /// ids.
    pub fn get_result(&self, id: &str) -> Result<Option<CrawlResult>> {
        if let Some(task) = self.registry.get(id) {
            return Ok(Some(CrawlResult {
                id: task.id().to_string(),
                status: task.status().as_str().to_string(),
                urls: task.found_urls(),
            }));
        }

        let store = self.store.lock().unwrap();
        let Some(record) = store.get_task(id)? else {
            return Ok(None);
        };
        let urls = store.list_found(id)?;

        Ok(Some(CrawlResult {
            id: record.id,
            status: record.status.as_str().to_string(),
            urls,
        }))
    }

    /// Returns the live task for `id`, if the crawl is still running.
    pub fn get_active_task(&self, id: &str) -> Option<Arc<CrawlTask>> {
        self.registry.get(id)
    }
}

fn validate_origin(origin: &str) -> Result<()> {
    let url =
        Url::parse(origin).map_err(|_| KeyseekError::InvalidOrigin(origin.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(KeyseekError::InvalidOrigin(origin.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;
    use crate::task::TaskStatus;
    use chrono::Utc;

    fn service() -> (
        CrawlService<SqliteStore>,
        mpsc::UnboundedReceiver<CrawlJob>,
        Arc<TaskRegistry>,
        Arc<Mutex<SqliteStore>>,
    ) {
        let registry = Arc::new(TaskRegistry::new());
        let store = Arc::new(Mutex::new(SqliteStore::new_in_memory().unwrap()));
        let (tx, rx) = mpsc::unbounded_channel();
        let service = CrawlService::new(Arc::clone(&registry), Arc::clone(&store), tx);
        (service, rx, registry, store)
    }

    #[test]
    fn test_start_crawl_dispatches_job() {
        let (service, mut rx, registry, store) = service();

        let id = service
            .start_crawl("security", "http://example.com/")
            .unwrap();
        assert_eq!(id.len(), 8);

        // Live task registered and durable row created
        assert!(registry.get(&id).is_some());
        let record = store.lock().unwrap().get_task(&id).unwrap().unwrap();
        assert_eq!(record.keyword, "security");
        assert_eq!(record.status, TaskStatus::Active);

        // Job payload carries the fixed versioned structure
        let job = rx.try_recv().unwrap();
        assert_eq!(job.version, CrawlJob::VERSION);
        assert_eq!(job.id, id);
        assert_eq!(job.keyword, "security");
        assert_eq!(job.origin, "http://example.com/");
    }

    #[test]
    fn test_keyword_length_validated() {
        let (service, _rx, _registry, _store) = service();

        assert!(matches!(
            service.start_crawl("abc", "http://example.com/"),
            Err(KeyseekError::InvalidKeyword { got: 3 })
        ));
        assert!(matches!(
            service.start_crawl(&"x".repeat(33), "http://example.com/"),
            Err(KeyseekError::InvalidKeyword { got: 33 })
        ));

        // Boundary lengths are accepted
        assert!(service.start_crawl("abcd", "http://example.com/").is_ok());
        assert!(service
            .start_crawl(&"x".repeat(32), "http://example.com/")
            .is_ok());
    }

    #[test]
    fn test_origin_validated() {
        let (service, _rx, _registry, _store) = service();

        assert!(matches!(
            service.start_crawl("security", "not a url"),
            Err(KeyseekError::InvalidOrigin(_))
        ));
        assert!(matches!(
            service.start_crawl("security", "ftp://example.com/"),
            Err(KeyseekError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn test_get_result_from_live_task() {
        let (service, _rx, registry, _store) = service();

        let id = service
            .start_crawl("security", "http://example.com/")
            .unwrap();
        let task = registry.get(&id).unwrap();
        task.add_found("http://example.com/p1");

        let result = service.get_result(&id).unwrap().unwrap();
        assert_eq!(result.status, "active");
        assert_eq!(result.urls, vec!["http://example.com/p1".to_string()]);
    }

    #[test]
    fn test_get_result_falls_back_to_storage() {
        let (service, _rx, registry, store) = service();

        let id = service
            .start_crawl("security", "http://example.com/")
            .unwrap();
        {
            let mut store = store.lock().unwrap();
            store.record_found(&id, "http://example.com/p1").unwrap();
            store.finalize_task(&id, Utc::now(), 3, 1).unwrap();
        }
        registry.remove(&id);

        let result = service.get_result(&id).unwrap().unwrap();
        assert_eq!(result.status, "done");
        assert_eq!(result.urls, vec!["http://example.com/p1".to_string()]);
    }

    #[test]
    fn test_get_result_unknown_id() {
        let (service, _rx, _registry, _store) = service();
        assert!(service.get_result("missing0").unwrap().is_none());
    }
}
