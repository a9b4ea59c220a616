//! URL handling module for keyseek
//!
//! This module decides which discovered links belong to the crawl: resolving
//! anchor hrefs against the page they appeared on, and comparing the result
//! against the crawl's origin (scheme + host + effective port).

mod origin;
mod resolve;

pub use origin::{effective_port, same_origin};
pub use resolve::resolve_href;
