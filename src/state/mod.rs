//! State module for tracking crawl task progress
//!
//! Every crawl task walks a small state machine: it starts `Pending` and ends
//! in exactly one terminal state.
//!
//! # Components
//!
//! - `TaskState`: The lifecycle state of a single crawl task
//! - `SkipReason`: Why a task ended without fetching

mod task_state;

// Re-export main types
pub use task_state::{SkipReason, TaskState};
