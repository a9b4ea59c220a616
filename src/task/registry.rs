//! Live task registry
//!
//! The registry is the in-memory tier of result lookups: while a crawl runs,
//! its task lives here and queries read progressive state directly from it.
//! Once the lifecycle coordinator finalizes a task it is evicted, and
//! lookups fall through to durable storage.

use crate::task::CrawlTask;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Concurrent map of task id to live crawl task.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, Arc<CrawlTask>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, task: Arc<CrawlTask>) {
        self.tasks
            .write()
            .unwrap()
            .insert(task.id().to_string(), task);
    }

    pub fn get(&self, id: &str) -> Option<Arc<CrawlTask>> {
        self.tasks.read().unwrap().get(id).cloned()
    }

    /// Removes and returns the task, if present.
    pub fn remove(&self, id: &str) -> Option<Arc<CrawlTask>> {
        self.tasks.write().unwrap().remove(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().unwrap().is_empty()
    }
}
