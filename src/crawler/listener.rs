//! Crawl lifecycle coordinator
//!
//! Consumes dispatched crawl jobs and guarantees that every task ends up
//! finalized: whatever happens inside the engine (normal completion, cutoff,
//! or a panic), the task is forced to `done`, its end time and final
//! counters are persisted, and it is evicted from the live registry so
//! result queries fall back to durable storage.

use crate::crawler::engine::CrawlEngine;
use crate::service::CrawlJob;
use crate::storage::CrawlStore;
use crate::task::{CrawlTask, TaskRegistry};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Worker that receives dispatched jobs and runs crawls.
pub struct CrawlWorker<S: CrawlStore> {
    engine: Arc<CrawlEngine<S>>,
    registry: Arc<TaskRegistry>,
    store: Arc<Mutex<S>>,
}

impl<S: CrawlStore + Send + 'static> CrawlWorker<S> {
    pub fn new(
        engine: CrawlEngine<S>,
        registry: Arc<TaskRegistry>,
        store: Arc<Mutex<S>>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            registry,
            store,
        }
    }

    /// Dispatch loop: spawns one worker task per received job. Cross-task
    /// concurrency is bounded only by what the runtime provides; within a
    /// job, fetching is strictly sequential.
    pub async fn run(self: Arc<Self>, mut jobs: mpsc::UnboundedReceiver<CrawlJob>) {
        while let Some(job) = jobs.recv().await {
            let worker = Arc::clone(&self);
            tokio::spawn(async move {
                worker.handle_job(job).await;
            });
        }
    }

    /// Handles one dispatched job end-to-end.
    ///
    /// The task normally comes from the live registry; a job whose task is
    /// missing (e.g. redelivered after a restart) is reconstructed from the
    /// payload. Finalization runs on every path out of the engine.
    pub async fn handle_job(&self, job: CrawlJob) {
        tracing::info!("Received crawl job from queue: {}", job.id);

        let task = match self.registry.get(&job.id) {
            Some(task) => task,
            None => {
                let task = Arc::new(CrawlTask::new(job.id, job.keyword, job.origin));
                self.registry.insert(Arc::clone(&task));
                task
            }
        };

        // The engine runs in its own tokio task so a panic inside the BFS
        // loop cannot skip finalization
        let engine = Arc::clone(&self.engine);
        let run = {
            let task = Arc::clone(&task);
            tokio::spawn(async move { engine.run(&task).await })
        };

        match run.await {
            Ok(()) => tracing::info!("Crawl task completed successfully: {}", task.id()),
            Err(e) => tracing::error!("Crawl engine failed for task {}: {}", task.id(), e),
        }

        self.finalize(&task);
    }

    /// Forces the task done (idempotent) and freezes its durable record.
    fn finalize(&self, task: &Arc<CrawlTask>) {
        task.set_done();

        let finished_at = task.finished_at().unwrap_or_else(Utc::now);
        {
            let mut store = self.store.lock().unwrap();
            if let Err(e) = store.finalize_task(
                task.id(),
                finished_at,
                task.pages_visited() as u64,
                task.urls_found() as u64,
            ) {
                tracing::error!("Failed to finalize task {}: {}", task.id(), e);
            }
        }

        self.registry.remove(task.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::crawler::HttpFetcher;
    use crate::storage::SqliteStore;
    use crate::task::TaskStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> CrawlerConfig {
        CrawlerConfig {
            timeout_ms: 5_000,
            user_agent: "keyseek-test/0.1".to_string(),
            delay_ms: 1,
            max_pages: 10,
            queue_poll_wait_ms: 20,
        }
    }

    fn worker_with_store(
        config: CrawlerConfig,
    ) -> (Arc<CrawlWorker<SqliteStore>>, Arc<TaskRegistry>, Arc<Mutex<SqliteStore>>) {
        let store = Arc::new(Mutex::new(SqliteStore::new_in_memory().unwrap()));
        let registry = Arc::new(TaskRegistry::new());
        let fetcher = HttpFetcher::new(&config).unwrap();
        let engine = CrawlEngine::new(config, fetcher, Arc::clone(&store));
        let worker = Arc::new(CrawlWorker::new(
            engine,
            Arc::clone(&registry),
            Arc::clone(&store),
        ));
        (worker, registry, store)
    }

    #[tokio::test]
    async fn test_job_finalizes_and_evicts_task() {
        let server = MockServer::start().await;
        let origin = format!("{}/", server.uri());

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>security here</body></html>"),
            )
            .mount(&server)
            .await;

        let (worker, registry, store) = worker_with_store(test_config());
        {
            let mut store = store.lock().unwrap();
            store
                .create_task("job00001", "security", &origin, Utc::now())
                .unwrap();
        }
        let task = Arc::new(CrawlTask::new("job00001", "security", origin.as_str()));
        registry.insert(Arc::clone(&task));

        worker
            .handle_job(CrawlJob::new("job00001", "security", origin.as_str()))
            .await;

        // Task is done, evicted, and its durable record is frozen
        assert_eq!(task.status(), TaskStatus::Done);
        assert!(registry.get("job00001").is_none());

        let store = store.lock().unwrap();
        let record = store.get_task("job00001").unwrap().unwrap();
        assert_eq!(record.status, TaskStatus::Done);
        assert!(record.finished_at.is_some());
        assert_eq!(record.pages_visited, 1);
        assert_eq!(record.urls_found, 1);
        assert_eq!(store.list_found("job00001").unwrap(), vec![origin]);
    }

    #[tokio::test]
    async fn test_job_without_live_task_is_reconstructed() {
        let server = MockServer::start().await;
        let origin = format!("{}/", server.uri());

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let (worker, registry, store) = worker_with_store(test_config());
        {
            let mut store = store.lock().unwrap();
            store
                .create_task("job00002", "security", &origin, Utc::now())
                .unwrap();
        }

        // No registry entry: the payload alone must be enough
        worker
            .handle_job(CrawlJob::new("job00002", "security", origin.as_str()))
            .await;

        assert!(registry.is_empty());
        let store = store.lock().unwrap();
        let record = store.get_task("job00002").unwrap().unwrap();
        assert_eq!(record.status, TaskStatus::Done);
        assert_eq!(record.pages_visited, 1);
        assert_eq!(record.urls_found, 0);
    }
}
