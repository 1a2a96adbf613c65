//! Termination signal handling for the bridge binary.

use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use thiserror::Error;

/// Signals that request a cooperative shutdown.
pub const SHUTDOWN_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Errors reported while installing signal handlers.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registering a handler failed.
    #[error("failed to install handler for signal {signal}: {source}")]
    Install {
        /// Signal number that could not be registered.
        signal: i32,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Registers [`SHUTDOWN_SIGNALS`] against a shared flag.
///
/// The returned flag becomes `true` once any of the signals is delivered.
///
/// # Errors
///
/// Fails when the operating system refuses a handler registration.
pub fn install() -> Result<Arc<AtomicBool>, ShutdownError> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in SHUTDOWN_SIGNALS {
        signal_hook::flag::register(signal, Arc::clone(&flag))
            .map_err(|source| ShutdownError::Install { signal, source })?;
    }
    Ok(flag)
}
