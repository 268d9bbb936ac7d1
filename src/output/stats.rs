//! Crawl statistics
//!
//! Tasks bump lock-free counters as they reach a terminal state; once the
//! crawl has finished the counters are frozen into a `CrawlReport`.

use crate::state::{SkipReason, TaskState};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters shared by every task of one crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    spawned: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    skipped_depth: AtomicU64,
    skipped_duplicate: AtomicU64,
    skipped_cancelled: AtomicU64,
    links_discovered: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a task that has just been spawned
    pub fn record_spawn(&self) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts links found on a fetched page
    pub fn record_links(&self, count: usize) {
        self.links_discovered
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Counts a task that reached a terminal state
    pub fn record_outcome(&self, state: TaskState) {
        let counter = match state {
            TaskState::Pending => return,
            TaskState::Completed => &self.completed,
            TaskState::Failed => &self.failed,
            TaskState::Skipped(SkipReason::DepthExhausted) => &self.skipped_depth,
            TaskState::Skipped(SkipReason::Duplicate) => &self.skipped_duplicate,
            TaskState::Skipped(SkipReason::Cancelled) => &self.skipped_cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of tasks that have reached a terminal state
    pub fn terminated(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
            + self.failed.load(Ordering::Relaxed)
            + self.skipped_depth.load(Ordering::Relaxed)
            + self.skipped_duplicate.load(Ordering::Relaxed)
            + self.skipped_cancelled.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a report
    pub fn snapshot(
        &self,
        seed: &str,
        max_depth: i64,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cancelled: bool,
    ) -> CrawlReport {
        CrawlReport {
            seed: seed.to_string(),
            max_depth,
            started_at,
            finished_at,
            cancelled,
            tasks_spawned: self.spawned.load(Ordering::Relaxed),
            pages_fetched: self.completed.load(Ordering::Relaxed),
            fetch_failures: self.failed.load(Ordering::Relaxed),
            skipped_depth: self.skipped_depth.load(Ordering::Relaxed),
            skipped_duplicate: self.skipped_duplicate.load(Ordering::Relaxed),
            skipped_cancelled: self.skipped_cancelled.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
        }
    }
}

/// Final summary of one crawl invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub seed: String,
    pub max_depth: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Whether cancellation was raised before the crawl finished
    pub cancelled: bool,

    pub tasks_spawned: u64,
    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub skipped_depth: u64,
    pub skipped_duplicate: u64,
    pub skipped_cancelled: u64,
    pub links_discovered: u64,
}

impl CrawlReport {
    /// Wall-clock time between start and finish
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Tasks that reached any terminal state
    pub fn tasks_terminated(&self) -> u64 {
        self.pages_fetched
            + self.fetch_failures
            + self.skipped_depth
            + self.skipped_duplicate
            + self.skipped_cancelled
    }

    /// Fetches attempted (succeeded or failed)
    pub fn fetches_attempted(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }

    /// Returns the success rate of attempted fetches as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.fetches_attempted();
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Seed: {}", report.seed);
    println!("  Max depth: {}", report.max_depth);
    println!("  Duration: {:.2?}", report.duration());
    if report.cancelled {
        println!("  Cancelled: yes");
    }
    println!();

    println!("Tasks:");
    println!("  Spawned: {}", report.tasks_spawned);
    println!("  Pages fetched: {}", report.pages_fetched);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!("  Skipped (depth): {}", report.skipped_depth);
    println!("  Skipped (duplicate): {}", report.skipped_duplicate);
    println!("  Skipped (cancelled): {}", report.skipped_cancelled);
    println!();

    println!("  Links discovered: {}", report.links_discovered);
    println!("  Success rate: {:.2}%", report.success_rate());
}
