//! Single-connection acceptor and reader loop.

use std::fmt;
use std::io::{self, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use parkbridge_config::Config;

use super::{AcceptorError, ChunkSink, TRANSPORT_TARGET};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const READ_BUFFER_BYTES: usize = 4096;

/// Lifecycle of an [`Acceptor`].
///
/// `Idle -> Listening -> Connected -> Closed`; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptorState {
    /// Constructed but not yet bound.
    Idle,
    /// Bound and waiting for the producer.
    Listening,
    /// Reading from the producer.
    Connected,
    /// Stopped, disconnected, or failed.
    Closed,
}

impl fmt::Display for AcceptorState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Connected => "connected",
            Self::Closed => "closed",
        })
    }
}

struct Shared {
    state: Mutex<AcceptorState>,
    shutdown: AtomicBool,
    stream: Mutex<Option<TcpStream>>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, AcceptorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: AcceptorState) {
        let mut state = self.state();
        if *state != AcceptorState::Closed {
            *state = next;
        }
    }

    fn stream(&self) -> MutexGuard<'_, Option<TcpStream>> {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(stream) = self.stream().take()
            && let Err(error) = stream.shutdown(Shutdown::Both)
            && error.kind() != io::ErrorKind::NotConnected
        {
            debug!(
                target: TRANSPORT_TARGET,
                error = %error,
                "failed to shut down producer stream"
            );
        }
    }
}

/// Marks the acceptor closed when the reader thread exits, even by panic.
struct CloseOnExit(Arc<Shared>);

impl Drop for CloseOnExit {
    fn drop(&mut self) {
        *self.0.state() = AcceptorState::Closed;
        self.0.stream().take();
    }
}

/// Accepts one producer connection and reads it on a background thread.
///
/// An acceptor is single-use: once `Closed`, a new instance must be built to
/// listen again.
pub struct Acceptor {
    host: String,
    port: u16,
    shared: Arc<Shared>,
    handle: Option<thread::JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl Acceptor {
    /// Creates an idle acceptor for `host:port`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            shared: Arc::new(Shared {
                state: Mutex::new(AcceptorState::Idle),
                shutdown: AtomicBool::new(false),
                stream: Mutex::new(None),
            }),
            handle: None,
            local_addr: None,
        }
    }

    /// Creates an idle acceptor for the configured listen address.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.listen_host(), config.listen_port())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AcceptorState {
        *self.shared.state()
    }

    /// Address actually bound, once listening.
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Binds the port and starts waiting for the producer.
    ///
    /// Bytes read from the producer are forwarded to `sink` on the reader
    /// thread.
    ///
    /// # Errors
    ///
    /// Fails when the acceptor has already been started or the port cannot be
    /// bound. A bind failure leaves the acceptor `Closed`.
    pub fn start<K>(&mut self, sink: K) -> Result<SocketAddr, AcceptorError>
    where
        K: ChunkSink,
    {
        let state = self.state();
        if state != AcceptorState::Idle {
            return Err(AcceptorError::AlreadyStarted { state });
        }

        let listener = match self.bind() {
            Ok(listener) => listener,
            Err(error) => {
                warn!(
                    target: TRANSPORT_TARGET,
                    host = %self.host,
                    port = self.port,
                    error = %error,
                    "failed to start acceptor"
                );
                self.shared.set_state(AcceptorState::Closed);
                return Err(error);
            }
        };
        let addr = listener.local_addr().map_err(|source| {
            self.shared.set_state(AcceptorState::Closed);
            AcceptorError::LocalAddr { source }
        })?;

        self.shared.set_state(AcceptorState::Listening);
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(String::from("parkbridge-reader"))
            .spawn(move || run_reader(listener, &shared, sink))
            .map_err(|source| {
                self.shared.set_state(AcceptorState::Closed);
                AcceptorError::Spawn { source }
            })?;

        self.handle = Some(handle);
        self.local_addr = Some(addr);
        Ok(addr)
    }

    /// Stops listening or reading and waits for the reader thread to exit.
    ///
    /// Safe to call in any state, including before `start`.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptorError::ThreadPanic`] if the reader thread panicked.
    pub fn stop(&mut self) -> Result<(), AcceptorError> {
        self.shared.request_shutdown();
        let joined = match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| AcceptorError::ThreadPanic),
            None => Ok(()),
        };
        self.shared.set_state(AcceptorState::Closed);
        joined
    }

    fn bind(&self) -> Result<TcpListener, AcceptorError> {
        let listener = bind_tcp(&self.host, self.port)?;
        listener
            .set_nonblocking(true)
            .map_err(|source| AcceptorError::NonBlocking { source })?;
        Ok(listener)
    }
}

impl Drop for Acceptor {
    fn drop(&mut self) {
        self.shared.request_shutdown();
    }
}

fn run_reader<K: ChunkSink>(listener: TcpListener, shared: &Arc<Shared>, mut sink: K) {
    let _close = CloseOnExit(Arc::clone(shared));
    info!(
        target: TRANSPORT_TARGET,
        addr = ?listener.local_addr().ok(),
        "acceptor listening"
    );

    let Some((stream, peer)) = wait_for_producer(&listener, shared) else {
        info!(target: TRANSPORT_TARGET, "acceptor stopped before a producer connected");
        return;
    };
    // Only one producer per acceptor; further attempts are refused.
    drop(listener);

    if let Err(error) = register_stream(&stream, shared) {
        warn!(
            target: TRANSPORT_TARGET,
            peer = %peer,
            error = %error,
            "failed to prepare producer stream"
        );
        sink.finish();
        return;
    }

    shared.set_state(AcceptorState::Connected);
    info!(target: TRANSPORT_TARGET, peer = %peer, "producer connected");
    read_stream(stream, shared, &mut sink);
    sink.finish();
    info!(target: TRANSPORT_TARGET, peer = %peer, "producer disconnected");
}

fn wait_for_producer(listener: &TcpListener, shared: &Shared) -> Option<(TcpStream, SocketAddr)> {
    while !shared.is_shutting_down() {
        match listener.accept() {
            Ok(accepted) => return Some(accepted),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock
                        | io::ErrorKind::Interrupted
                        | io::ErrorKind::ConnectionAborted
                ) =>
            {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                warn!(
                    target: TRANSPORT_TARGET,
                    error = %error,
                    "socket accept error"
                );
                return None;
            }
        }
    }
    None
}

fn register_stream(stream: &TcpStream, shared: &Shared) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    let handle = stream.try_clone()?;
    *shared.stream() = Some(handle);
    if shared.is_shutting_down() {
        // `stop` may have run before the clone was registered.
        shared.request_shutdown();
    }
    Ok(())
}

fn read_stream<K: ChunkSink>(mut stream: TcpStream, shared: &Shared, sink: &mut K) {
    let mut buffer = [0_u8; READ_BUFFER_BYTES];
    while !shared.is_shutting_down() {
        match stream.read(&mut buffer) {
            Ok(0) => return,
            Ok(read) => {
                if let Some(chunk) = buffer.get(..read) {
                    sink.accept_chunk(chunk);
                }
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => {
                if !shared.is_shutting_down() {
                    warn!(
                        target: TRANSPORT_TARGET,
                        error = %error,
                        "producer read error"
                    );
                }
                return;
            }
        }
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, AcceptorError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|source| AcceptorError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?
        .next()
        .ok_or_else(|| AcceptorError::ResolveEmpty {
            host: host.to_owned(),
            port,
        })?;
    TcpListener::bind(addr).map_err(|source| AcceptorError::Bind { addr, source })
}
