//! Error types for acceptor operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use super::AcceptorState;

/// Errors surfaced while binding or running the acceptor.
#[derive(Debug, Error)]
pub enum AcceptorError {
    /// The listen host could not be resolved.
    #[error("failed to resolve TCP address {host}:{port}: {source}")]
    Resolve {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Underlying resolver error.
        #[source]
        source: io::Error,
    },
    /// The listen host resolved to no addresses.
    #[error("no TCP addresses resolved for {host}:{port}")]
    ResolveEmpty {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
    },
    /// The port is unavailable.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Underlying bind error.
        #[source]
        source: io::Error,
    },
    /// The bound address could not be read back.
    #[error("failed to read bound listener address: {source}")]
    LocalAddr {
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// The listener could not be switched to non-blocking accepts.
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// The reader thread could not be started.
    #[error("failed to spawn reader thread: {source}")]
    Spawn {
        /// Underlying thread builder error.
        #[source]
        source: io::Error,
    },
    /// `start` was called on an acceptor that already left `Idle`.
    #[error("acceptor cannot start from the {state} state")]
    AlreadyStarted {
        /// State the acceptor was in.
        state: AcceptorState,
    },
    /// The reader thread panicked.
    #[error("reader thread panicked")]
    ThreadPanic,
}
