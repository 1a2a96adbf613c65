//! Error types for the dispatch queue.

use std::error::Error as StdError;

use thiserror::Error;

/// Errors returned when a task cannot be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    /// The queue already holds `capacity` pending tasks.
    #[error("dispatch queue is full ({capacity} pending tasks)")]
    Full {
        /// Configured queue bound.
        capacity: usize,
    },
}

/// Failure reported by a task while it runs during a drain.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct TaskError {
    context: &'static str,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl TaskError {
    /// Wraps a failure with a short description of the work that failed.
    pub fn new(context: &'static str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            context,
            source: source.into(),
        }
    }

    /// Description of the failed work.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }
}
