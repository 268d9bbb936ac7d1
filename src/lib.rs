//! Ripple-Crawl: a concurrent, depth-bounded web crawler
//!
//! Starting from a seed address, the crawler fetches a page, extracts its
//! outbound links and visits each of them concurrently until the depth bound
//! is exhausted. Every address is fetched at most once per crawl, no matter
//! how many branches discover it.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid seed address: {0}")]
    InvalidSeed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons a single fetch can fail
///
/// A fetch failure only ends the branch that issued it; the rest of the crawl
/// carries on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("request timeout for {0}")]
    Timeout(String),

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    CrawlHandle, Crawler, FetchedPage, Fetcher, HttpFetcher, StaticFetcher, VisitedSet,
};
pub use output::{CrawlRecord, CrawlReport, FetchFailure, ResultSink};
pub use state::{SkipReason, TaskState};
