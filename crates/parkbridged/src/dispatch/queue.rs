//! FIFO task queue shared between one producer thread and the host tick.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, warn};

use super::{DISPATCH_TARGET, EnqueueError, TaskError};

/// Unit of work executed on the consumer thread against its state.
pub type Task<S> = Box<dyn FnOnce(&mut S) -> Result<(), TaskError> + Send + 'static>;

struct Shared<S> {
    tasks: Mutex<VecDeque<Task<S>>>,
    capacity: Option<usize>,
    rejected: AtomicU64,
}

impl<S> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, VecDeque<Task<S>>> {
        // Critical sections only push or swap, so a poisoned queue is intact.
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enqueue(&self, task: Task<S>) -> Result<(), EnqueueError> {
        let mut tasks = self.lock();
        if let Some(capacity) = self.capacity
            && tasks.len() >= capacity
        {
            drop(tasks);
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(EnqueueError::Full { capacity });
        }
        tasks.push_back(task);
        Ok(())
    }
}

/// Outcome counters for a single [`DispatchQueue::drain_all`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Tasks that completed successfully.
    pub executed: usize,
    /// Tasks that returned an error.
    pub failed: usize,
    /// Tasks that panicked.
    pub panicked: usize,
}

impl DrainReport {
    /// Number of tasks taken from the queue.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.executed + self.failed + self.panicked
    }

    /// Whether the drain found nothing to run.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Consumer side of the queue.
///
/// Only the owner of the `DispatchQueue` can drain it, and draining needs
/// `&mut self`, so tasks only ever run on the thread that owns the state.
pub struct DispatchQueue<S> {
    shared: Arc<Shared<S>>,
    batch: VecDeque<Task<S>>,
}

impl<S> DispatchQueue<S> {
    /// Creates a queue holding at most `capacity` pending tasks, or an
    /// unbounded queue for `None`.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            shared: Arc::new(Shared {
                tasks: Mutex::new(VecDeque::new()),
                capacity,
                rejected: AtomicU64::new(0),
            }),
            batch: VecDeque::new(),
        }
    }

    /// Creates a queue with no pending-task bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Returns a producer handle that may be moved to another thread.
    #[must_use]
    pub fn enqueuer(&self) -> Enqueuer<S> {
        Enqueuer {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Queues a task from the consumer thread itself.
    ///
    /// # Errors
    ///
    /// Returns [`EnqueueError::Full`] when the queue is at capacity.
    pub fn enqueue<F>(&self, task: F) -> Result<(), EnqueueError>
    where
        F: FnOnce(&mut S) -> Result<(), TaskError> + Send + 'static,
    {
        self.shared.enqueue(Box::new(task))
    }

    /// Tasks waiting for the next drain.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.lock().len()
    }

    /// Tasks refused because the queue was full.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.shared.rejected.load(Ordering::Relaxed)
    }

    /// Runs every task queued so far, in enqueue order, against `state`.
    ///
    /// The pending tasks are swapped out under the lock and executed after it
    /// is released, so producers keep enqueuing while tasks run. Tasks queued
    /// during the drain wait for the next call. A task that fails or panics is
    /// logged and counted; the remaining tasks still run.
    pub fn drain_all(&mut self, state: &mut S) -> DrainReport {
        {
            let mut tasks = self.shared.lock();
            std::mem::swap(&mut *tasks, &mut self.batch);
        }

        let mut report = DrainReport::default();
        for task in self.batch.drain(..) {
            match panic::catch_unwind(AssertUnwindSafe(|| task(state))) {
                Ok(Ok(())) => report.executed += 1,
                Ok(Err(task_error)) => {
                    report.failed += 1;
                    warn!(
                        target: DISPATCH_TARGET,
                        error = %task_error,
                        context = task_error.context(),
                        "dispatched task failed"
                    );
                }
                Err(payload) => {
                    report.panicked += 1;
                    error!(
                        target: DISPATCH_TARGET,
                        panic = panic_message(payload.as_ref()),
                        "dispatched task panicked"
                    );
                }
            }
        }
        report
    }
}

impl<S> Default for DispatchQueue<S> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Producer handle for a [`DispatchQueue`].
pub struct Enqueuer<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for Enqueuer<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> Enqueuer<S> {
    /// Appends a task; safe to call while the consumer is draining.
    ///
    /// # Errors
    ///
    /// Returns [`EnqueueError::Full`] when the queue is at capacity. The task
    /// is dropped and the rejection counted; queued tasks are never displaced.
    pub fn enqueue<F>(&self, task: F) -> Result<(), EnqueueError>
    where
        F: FnOnce(&mut S) -> Result<(), TaskError> + Send + 'static,
    {
        self.shared.enqueue(Box::new(task))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
