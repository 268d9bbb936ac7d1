/// Task state definitions for tracking crawl progress
///
/// This module defines every state a crawl task can be in.
use std::fmt;

/// Why a task terminated without fetching its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The remaining depth reached zero
    DepthExhausted,

    /// Another branch already claimed this address
    Duplicate,

    /// The crawl was cancelled before this task could fetch
    Cancelled,
}

impl SkipReason {
    /// Returns the short label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthExhausted => "depth_exhausted",
            Self::Duplicate => "duplicate",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task has been spawned but has not reached a decision yet
    Pending,

    // ===== Terminal States =====
    /// Task ended without fetching
    Skipped(SkipReason),

    /// The fetch failed; the branch ends here
    Failed,

    /// The page was fetched, emitted, and its children were spawned
    Completed,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the short label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Skipped(reason) => reason.as_str(),
            Self::Failed => "failed",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
