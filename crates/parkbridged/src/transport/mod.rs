//! TCP acceptor for the simulator's event feed.
//!
//! The acceptor binds a configured port, accepts exactly one producer
//! connection, and forwards every chunk it reads to a [`ChunkSink`] on a
//! dedicated background thread.

mod acceptor;
mod errors;
mod sink;
#[cfg(test)]
mod test_utils;

pub use self::acceptor::{Acceptor, AcceptorState};
pub use self::errors::AcceptorError;
pub use self::sink::ChunkSink;
#[cfg(test)]
pub(crate) use self::test_utils::{RecordingSink, wait_until};

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
