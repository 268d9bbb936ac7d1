//! Output module for crawl results and summaries
//!
//! This module handles:
//! - The `ResultSink` interface the crawler emits records into
//! - Built-in sinks (console, in-memory, fan-out)
//! - Crawl statistics and the final report
//! - Markdown summaries of finished crawls

mod markdown;
mod sinks;
mod stats;
mod traits;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use sinks::{CollectingSink, ConsoleSink, MultiSink};
pub use stats::{print_report, CrawlReport, CrawlStats};
pub use traits::{CrawlRecord, FetchFailure, OutputError, OutputResult, ResultSink};
