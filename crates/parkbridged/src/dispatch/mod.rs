//! Cross-thread dispatch from the producer thread to the host tick.
//!
//! The acceptor's read loop runs on its own thread but must never touch the
//! parking model directly. Instead it enqueues tasks on a [`DispatchQueue`]
//! through a cloneable [`Enqueuer`]; the host drains the queue once per tick,
//! running each task on its own thread against the state it owns.

mod errors;
mod queue;

pub use self::errors::{EnqueueError, TaskError};
pub use self::queue::{DispatchQueue, DrainReport, Enqueuer, Task};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
