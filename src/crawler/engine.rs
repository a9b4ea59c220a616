//! Breadth-first crawl engine
//!
//! The engine drives one crawl task end-to-end: a FIFO frontier seeded with
//! the task's origin, a strictly sequential fetch loop bounded by the
//! configured page cap, same-origin link filtering, keyword matching over
//! raw markup, and two-tier visited dedup (the in-memory task set OR the
//! durable store — either signal counts, so dedup survives restarts).
//!
//! Exactly one worker runs the loop; status-query callers read the task
//! concurrently. Single-URL failures of any kind are logged at that
//! iteration and never abort the crawl. Cancellation (the task deactivated
//! from outside) is observed at the top of the next iteration.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchedPage, HttpFetcher};
use crate::crawler::matcher::contains_keyword;
use crate::storage::CrawlStore;
use crate::task::CrawlTask;
use crate::url::{resolve_href, same_origin};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// FIFO work queue of URLs to visit.
///
/// Backed by an unbounded channel so the pop supports a bounded wait: an
/// empty poll simply returns `None` and lets the caller re-check its loop
/// condition instead of busy-spinning.
struct Frontier {
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
    len: usize,
}

impl Frontier {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, len: 0 }
    }

    fn push(&mut self, url: String) {
        if self.tx.send(url).is_ok() {
            self.len += 1;
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    async fn pop(&mut self, wait: Duration) -> Option<String> {
        match tokio::time::timeout(wait, self.rx.recv()).await {
            Ok(Some(url)) => {
                self.len -= 1;
                Some(url)
            }
            _ => None,
        }
    }
}

/// Crawl engine: orchestrates the BFS loop for one task at a time.
///
/// Generic over the durable store so tests can run against in-memory SQLite.
pub struct CrawlEngine<S: CrawlStore> {
    config: CrawlerConfig,
    fetcher: HttpFetcher,
    store: Arc<Mutex<S>>,
}

impl<S: CrawlStore> CrawlEngine<S> {
    pub fn new(config: CrawlerConfig, fetcher: HttpFetcher, store: Arc<Mutex<S>>) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    /// Runs the BFS loop to completion or cutoff, then marks the task done.
    ///
    /// Loop conditions, re-checked every iteration: frontier non-empty, task
    /// still active, visited count below the page cap. The cap counts pages
    /// actually dequeued and visited; links merely discovered do not count.
    pub async fn run(&self, task: &CrawlTask) {
        tracing::info!("Starting crawl for task {}", task.id());

        let mut frontier = Frontier::new();
        frontier.push(task.origin().to_string());

        while !frontier.is_empty()
            && task.is_active()
            && task.pages_visited() < self.config.max_pages
        {
            let url = match frontier.pop(self.config.queue_poll_wait()).await {
                Some(url) => url,
                None => continue,
            };

            // Visited by either signal means visited: do not count, do not fetch
            if task.is_visited(&url) || self.is_visited_durable(task.id(), &url) {
                continue;
            }

            task.mark_visited(&url);
            self.record_visited_durable(task.id(), &url);

            self.process_page(task, &url, &mut frontier).await;

            // Politeness throttle between successive fetches
            tokio::time::sleep(self.config.delay()).await;
        }

        task.set_done();
        tracing::info!(
            "Crawl completed for task {} - pages visited: {}, URLs found: {}",
            task.id(),
            task.pages_visited(),
            task.urls_found()
        );
    }

    /// Fetches one page, applies the keyword matcher, and enqueues its
    /// same-origin links. Every failure here is local to this URL.
    async fn process_page(&self, task: &CrawlTask, url: &str, frontier: &mut Frontier) {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                return;
            }
        };

        if contains_keyword(&page.markup, task.keyword()) {
            if task.add_found(url) {
                self.record_found_durable(task.id(), url);
            }
            tracing::info!("Found keyword '{}' in URL: {}", task.keyword(), url);
        }

        self.enqueue_links(task, &page, frontier);
    }

    /// Resolves each anchor against the page's own URL, keeps same-origin
    /// targets not yet visited, and enqueues them.
    fn enqueue_links(&self, task: &CrawlTask, page: &FetchedPage, frontier: &mut Frontier) {
        for href in &page.hrefs {
            let resolved = match resolve_href(&page.url, href) {
                Some(url) => url,
                None => {
                    tracing::debug!("Dropping unresolvable href {} on {}", href, page.url);
                    continue;
                }
            };

            let absolute = resolved.to_string();
            if !same_origin(&absolute, task.origin()) {
                continue;
            }

            if task.is_visited(&absolute) || self.is_visited_durable(task.id(), &absolute) {
                continue;
            }

            frontier.push(absolute);
        }
    }

    fn is_visited_durable(&self, task_id: &str, url: &str) -> bool {
        match self.store.lock().unwrap().is_visited(task_id, url) {
            Ok(visited) => visited,
            Err(e) => {
                tracing::warn!("Durable visited check failed for {}: {}", url, e);
                false
            }
        }
    }

    fn record_visited_durable(&self, task_id: &str, url: &str) {
        if let Err(e) = self.store.lock().unwrap().record_visited(task_id, url) {
            tracing::warn!("Failed to persist visited URL {}: {}", url, e);
        }
    }

    fn record_found_durable(&self, task_id: &str, url: &str) {
        if let Err(e) = self.store.lock().unwrap().record_found(task_id, url) {
            tracing::warn!("Failed to persist found URL {}: {}", url, e);
        }
    }
}
