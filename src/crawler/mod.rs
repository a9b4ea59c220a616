//! Crawler module: keyword matching, page fetching, and the BFS engine
//!
//! This module contains the execution side of a crawl:
//! - HTTP fetching and anchor extraction ([`fetcher`])
//! - Case-insensitive keyword matching over raw markup ([`matcher`])
//! - The breadth-first crawl engine ([`engine`])
//! - The lifecycle coordinator that consumes dispatched jobs ([`listener`])

mod engine;
mod fetcher;
mod listener;
mod matcher;

pub use engine::CrawlEngine;
pub use fetcher::{FetchError, FetchedPage, HttpFetcher};
pub use listener::CrawlWorker;
pub use matcher::contains_keyword;
