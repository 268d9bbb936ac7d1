//! Crawler module for concurrent, depth-bounded crawling
//!
//! This module contains the core crawling logic, including:
//! - The `Fetcher` capability and its HTTP and in-memory implementations
//! - HTML parsing and link extraction
//! - The shared visited set used for deduplication
//! - The scheduler that fans out one task per discovered link

mod fetcher;
mod http;
mod parser;
mod scheduler;
mod static_fetcher;
mod visited;

pub use fetcher::{FetchedPage, Fetcher};
pub use http::{build_http_client, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{CrawlHandle, Crawler};
pub use static_fetcher::StaticFetcher;
pub use visited::VisitedSet;
