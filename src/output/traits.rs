//! Output handler traits and types
//!
//! This module defines the sink interface the crawler emits into and the
//! records that flow through it.

use crate::FetchError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A successfully fetched, newly visited page
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlRecord {
    /// The address that was fetched
    pub address: String,

    /// The content the fetcher returned
    pub content: String,

    /// Link hops from the seed (the seed itself is 0)
    pub depth: u32,

    /// Number of outbound links found on the page
    pub link_count: usize,

    /// When the fetch finished
    pub fetched_at: DateTime<Utc>,
}

/// A fetch that failed and ended its branch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    /// The address that could not be fetched
    pub address: String,

    /// Link hops from the seed
    pub depth: u32,

    /// What went wrong
    pub error: FetchError,
}

/// Trait for result sinks
///
/// The crawler calls into a sink from many tasks at once, so implementations
/// must be thread-safe. A failing sink never aborts the crawl; its errors are
/// logged and the task carries on.
pub trait ResultSink: Send + Sync {
    /// Records a successfully fetched page
    fn record_page(&self, record: &CrawlRecord) -> OutputResult<()>;

    /// Records a fetch failure
    fn record_failure(&self, failure: &FetchFailure) -> OutputResult<()>;
}
