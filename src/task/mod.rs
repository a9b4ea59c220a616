//! Crawl task state
//!
//! A [`CrawlTask`] holds the mutable state of one crawl: identity, keyword,
//! origin, the visited set, the ordered found list, and the active flag.
//! Exactly one engine worker writes to it, but status-query callers read it
//! concurrently, so the collections sit behind `RwLock` and the flag is
//! atomic. The task is shared as `Arc<CrawlTask>`.

mod id;
mod registry;

pub use id::generate_task_id;
pub use registry::TaskRegistry;

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Lifecycle status of a crawl task.
///
/// A task starts `Active` and becomes `Done` exactly once; there is no other
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Active,
    Done,
}

impl TaskStatus {
    /// String form used in query responses and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Done => "done",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of one crawl.
pub struct CrawlTask {
    id: String,
    keyword: String,
    origin: String,
    started_at: DateTime<Utc>,
    finished_at: RwLock<Option<DateTime<Utc>>>,
    visited: RwLock<HashSet<String>>,
    found: RwLock<Vec<String>>,
    active: AtomicBool,
}

impl CrawlTask {
    /// Creates a new active task. `id`, `keyword`, and `origin` are immutable
    /// for the task's lifetime; validation of the keyword happens at the
    /// service boundary before construction.
    pub fn new(id: impl Into<String>, keyword: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyword: keyword.into(),
            origin: origin.into(),
            started_at: Utc::now(),
            finished_at: RwLock::new(None),
            visited: RwLock::new(HashSet::new()),
            found: RwLock::new(Vec::new()),
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Set once, at the transition to `Done`.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        *self.finished_at.read().unwrap()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn status(&self) -> TaskStatus {
        if self.is_active() {
            TaskStatus::Active
        } else {
            TaskStatus::Done
        }
    }

    /// Marks the task done. Idempotent: only the first call records the end
    /// timestamp; the status never reverts to active.
    pub fn set_done(&self) {
        if self
            .active
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            *self.finished_at.write().unwrap() = Some(Utc::now());
        }
    }

    pub fn mark_visited(&self, url: &str) {
        self.visited.write().unwrap().insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.read().unwrap().contains(url)
    }

    /// Appends a URL to the found list, preserving discovery order. Returns
    /// false without modifying the list if the URL is already present; dedup
    /// is enforced here, not by the caller.
    pub fn add_found(&self, url: &str) -> bool {
        let mut found = self.found.write().unwrap();
        if found.iter().any(|u| u == url) {
            return false;
        }
        found.push(url.to_string());
        true
    }

    /// Number of pages dequeued and processed so far. Monotone while active,
    /// frozen at `Done`.
    pub fn pages_visited(&self) -> usize {
        self.visited.read().unwrap().len()
    }

    /// Number of URLs where the keyword matched. Monotone while active,
    /// frozen at `Done`.
    pub fn urls_found(&self) -> usize {
        self.found.read().unwrap().len()
    }

    /// Snapshot of the found list in discovery order.
    pub fn found_urls(&self) -> Vec<String> {
        self.found.read().unwrap().clone()
    }

    /// Snapshot of the visited set (membership only, no ordering).
    pub fn visited_urls(&self) -> HashSet<String> {
        self.visited.read().unwrap().clone()
    }
}

impl std::fmt::Debug for CrawlTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlTask")
            .field("id", &self.id)
            .field("keyword", &self.keyword)
            .field("origin", &self.origin)
            .field("status", &self.status())
            .field("pages_visited", &self.pages_visited())
            .field("urls_found", &self.urls_found())
            .finish()
    }
}
