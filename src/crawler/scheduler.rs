//! Crawl scheduler
//!
//! This module drives the recursive, concurrent traversal:
//! - One tokio task per crawl task, fanned out per discovered link
//! - Deduplication through the shared `VisitedSet`
//! - Optional global cap on fetches in flight via a semaphore
//! - Completion tracking with a `TaskTracker`, so waiting for a crawl means
//!   waiting for every transitively spawned task
//! - Cooperative cancellation: tasks that have not fetched yet stop early

use crate::crawler::fetcher::Fetcher;
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlRecord, CrawlReport, CrawlStats, FetchFailure, ResultSink};
use crate::state::{SkipReason, TaskState};
use crate::{CrawlError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Runs depth-bounded crawls over a fetcher
///
/// A `Crawler` can start any number of crawls. Each one gets its own visited
/// set, statistics and task tracker; only the fetcher and sink are shared.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::{Crawler, StaticFetcher};
/// use ripple_crawl::output::CollectingSink;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> ripple_crawl::Result<()> {
/// let fetcher = StaticFetcher::new()
///     .with_page("a", "Page A", ["b"])
///     .with_page("b", "Page B", ["a"]);
/// let sink = Arc::new(CollectingSink::new());
///
/// let crawler = Crawler::new(Arc::new(fetcher), sink.clone());
/// let report = crawler.crawl("a", 3).await?;
///
/// assert_eq!(report.pages_fetched, 2);
/// assert_eq!(sink.addresses(), vec!["a", "b"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ResultSink>,
    max_concurrent_fetches: Option<usize>,
}

impl Crawler {
    /// Creates a crawler with unbounded fan-out
    pub fn new(fetcher: Arc<dyn Fetcher>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            fetcher,
            sink,
            max_concurrent_fetches: None,
        }
    }

    /// Caps how many fetches may be in flight at once
    ///
    /// Tasks are still spawned for every discovered link; the cap only
    /// applies to the fetch itself. A limit of zero is treated as one.
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = Some(limit.max(1));
        self
    }

    /// Crawls from `seed` and returns once every task has terminated
    ///
    /// # Arguments
    ///
    /// * `seed` - The starting address; must not be empty
    /// * `depth` - Maximum link hops to follow; `depth <= 0` fetches nothing
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl finished (individual fetches may have failed)
    /// * `Err(CrawlError::InvalidSeed)` - The seed was empty
    pub async fn crawl(&self, seed: &str, depth: i64) -> Result<CrawlReport> {
        Ok(self.start(seed, depth)?.wait().await)
    }

    /// Starts a crawl in the background and returns a handle to it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, seed: &str, depth: i64) -> Result<CrawlHandle> {
        self.start_with_cancellation(seed, depth, CancellationToken::new())
    }

    /// Starts a crawl that stops early once `cancel` is raised
    ///
    /// Tasks that have not fetched yet when the token fires end as
    /// `Skipped(Cancelled)`. Fetches already in flight run to completion.
    pub fn start_with_cancellation(
        &self,
        seed: &str,
        depth: i64,
        cancel: CancellationToken,
    ) -> Result<CrawlHandle> {
        if seed.is_empty() {
            return Err(CrawlError::InvalidSeed(
                "seed address cannot be empty".to_string(),
            ));
        }

        let context = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            sink: Arc::clone(&self.sink),
            visited: VisitedSet::new(),
            stats: CrawlStats::new(),
            tracker: TaskTracker::new(),
            limiter: self.max_concurrent_fetches.map(Semaphore::new),
            cancel,
            max_depth: depth,
        });

        tracing::info!(
            "Starting crawl from {} (depth {}, concurrency {})",
            seed,
            depth,
            self.max_concurrent_fetches
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        let started_at = Utc::now();
        spawn_task(&context, seed.to_string(), depth);

        // Children are spawned by tasks the tracker already holds, so it
        // cannot drain before the whole tree has terminated.
        context.tracker.close();

        Ok(CrawlHandle {
            context,
            seed: seed.to_string(),
            started_at,
        })
    }
}

/// A crawl running in the background
pub struct CrawlHandle {
    context: Arc<CrawlContext>,
    seed: String,
    started_at: DateTime<Utc>,
}

impl CrawlHandle {
    /// Waits until the root task and every task it transitively spawned
    /// have terminated, then returns the final report
    pub async fn wait(self) -> CrawlReport {
        self.context.tracker.wait().await;

        let report = self.context.stats.snapshot(
            &self.seed,
            self.context.max_depth,
            self.started_at,
            Utc::now(),
            self.context.cancel.is_cancelled(),
        );

        tracing::info!(
            "Crawl completed: {} pages fetched, {} failures, {} duplicates skipped in {:?}",
            report.pages_fetched,
            report.fetch_failures,
            report.skipped_duplicate,
            report.duration()
        );

        report
    }

    /// Raises cancellation for this crawl
    pub fn cancel(&self) {
        self.context.cancel.cancel();
    }

    /// Returns the token that cancels this crawl
    pub fn cancellation_token(&self) -> CancellationToken {
        self.context.cancel.clone()
    }

    /// Number of addresses claimed so far
    pub fn visited(&self) -> usize {
        self.context.visited.len()
    }

    /// Returns true once every task has terminated
    pub fn is_finished(&self) -> bool {
        self.context.tracker.is_closed() && self.context.tracker.is_empty()
    }
}

/// Everything the tasks of one crawl share
struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ResultSink>,
    visited: VisitedSet,
    stats: CrawlStats,
    tracker: TaskTracker,
    limiter: Option<Semaphore>,
    cancel: CancellationToken,
    max_depth: i64,
}

impl CrawlContext {
    /// Link hops between the seed and a task with `remaining` depth left
    fn hops(&self, remaining: i64) -> u32 {
        u32::try_from(self.max_depth - remaining).unwrap_or(u32::MAX)
    }
}

fn spawn_task(context: &Arc<CrawlContext>, address: String, depth: i64) {
    context.stats.record_spawn();

    let task_context = Arc::clone(context);
    context.tracker.spawn(async move {
        let state = run_task(&task_context, &address, depth).await;
        debug_assert!(state.is_terminal());
        tracing::debug!("Task for {} ended as {}", address, state);
        task_context.stats.record_outcome(state);
    });
}

/// Runs one crawl task to a terminal state
async fn run_task(context: &Arc<CrawlContext>, address: &str, depth: i64) -> TaskState {
    if depth <= 0 {
        return TaskState::Skipped(SkipReason::DepthExhausted);
    }

    if context.cancel.is_cancelled() {
        return TaskState::Skipped(SkipReason::Cancelled);
    }

    if !context.visited.try_mark(address) {
        tracing::trace!("Skipping already visited {}", address);
        return TaskState::Skipped(SkipReason::Duplicate);
    }

    let permit = match &context.limiter {
        Some(limiter) => tokio::select! {
            biased;
            _ = context.cancel.cancelled() => {
                return TaskState::Skipped(SkipReason::Cancelled);
            }
            permit = limiter.acquire() => match permit {
                Ok(permit) => Some(permit),
                Err(_) => return TaskState::Skipped(SkipReason::Cancelled),
            },
        },
        None => None,
    };

    let fetched = context.fetcher.fetch(address).await;
    drop(permit);

    let hops = context.hops(depth);
    match fetched {
        Err(error) => {
            tracing::warn!("Failed to fetch {}: {}", address, error);
            let failure = FetchFailure {
                address: address.to_string(),
                depth: hops,
                error,
            };
            if let Err(e) = context.sink.record_failure(&failure) {
                tracing::warn!("Result sink rejected failure for {}: {}", address, e);
            }
            TaskState::Failed
        }
        Ok(page) => {
            let link_count = page.links.len();
            let record = CrawlRecord {
                address: address.to_string(),
                content: page.content,
                depth: hops,
                link_count,
                fetched_at: Utc::now(),
            };
            if let Err(e) = context.sink.record_page(&record) {
                tracing::warn!("Result sink rejected page {}: {}", address, e);
            }
            context.stats.record_links(link_count);

            for link in page.links {
                spawn_task(context, link, depth - 1);
            }
            TaskState::Completed
        }
    }
}
