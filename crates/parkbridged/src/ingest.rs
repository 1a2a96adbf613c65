//! Producer-side pipeline: framing, parsing and enqueueing.
//!
//! [`EventIngest`] runs on the acceptor's reader thread. It never touches the
//! parking model; each parsed event is moved into a task that the host runs
//! when it drains the dispatch queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::dispatch::Enqueuer;
use crate::framer::{Frame, Framer};
use crate::parking::ParkingZoneIndex;
use crate::protocol::ParkingEvent;
use crate::transport::ChunkSink;

const INGEST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::ingest");

/// Counters shared between the reader thread and the host.
#[derive(Debug, Default)]
pub struct IngestStats {
    frames: AtomicU64,
    events: AtomicU64,
    parse_failures: AtomicU64,
    frame_errors: AtomicU64,
    rejected: AtomicU64,
    lookup_misses: AtomicU64,
}

/// Point-in-time copy of [`IngestStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSnapshot {
    /// Complete lines framed.
    pub frames: u64,
    /// Events parsed and queued.
    pub events: u64,
    /// Lines discarded by the parser.
    pub parse_failures: u64,
    /// Oversized frames and unterminated tails discarded.
    pub frame_errors: u64,
    /// Events dropped because the dispatch queue was full.
    pub rejected: u64,
    /// Applied events that referenced an unknown space.
    pub lookup_misses: u64,
}

impl IngestStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copies the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> IngestSnapshot {
        IngestSnapshot {
            frames: self.frames.load(Ordering::Relaxed),
            events: self.events.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            frame_errors: self.frame_errors.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            lookup_misses: self.lookup_misses.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// [`ChunkSink`] that turns producer bytes into queued parking events.
pub struct EventIngest {
    framer: Framer,
    enqueuer: Enqueuer<ParkingZoneIndex>,
    stats: Arc<IngestStats>,
}

impl EventIngest {
    /// Creates a pipeline feeding `enqueuer`.
    #[must_use]
    pub const fn new(
        enqueuer: Enqueuer<ParkingZoneIndex>,
        max_frame_bytes: usize,
        stats: Arc<IngestStats>,
    ) -> Self {
        Self {
            framer: Framer::new(max_frame_bytes),
            enqueuer,
            stats,
        }
    }

    fn handle_frame(&self, frame: &Frame) {
        IngestStats::bump(&self.stats.frames);
        if frame.is_lossy() {
            debug!(
                target: INGEST_TARGET,
                "replaced invalid UTF-8 in producer message"
            );
        }

        let event = match ParkingEvent::parse(frame.text()) {
            Ok(event) => event,
            Err(error) => {
                IngestStats::bump(&self.stats.parse_failures);
                debug!(
                    target: INGEST_TARGET,
                    reason = error.kind(),
                    error = %error,
                    line = frame.text(),
                    "discarding producer message"
                );
                return;
            }
        };

        debug!(target: INGEST_TARGET, event = %event, "event received");
        let stats = Arc::clone(&self.stats);
        let queued = self.enqueuer.enqueue(move |zones: &mut ParkingZoneIndex| {
            if zones.apply(&event).is_err() {
                IngestStats::bump(&stats.lookup_misses);
            }
            Ok(())
        });
        match queued {
            Ok(()) => IngestStats::bump(&self.stats.events),
            Err(error) => {
                IngestStats::bump(&self.stats.rejected);
                warn!(
                    target: INGEST_TARGET,
                    error = %error,
                    "dropping parking event"
                );
            }
        }
    }
}

impl ChunkSink for EventIngest {
    fn accept_chunk(&mut self, chunk: &[u8]) {
        for result in self.framer.feed(chunk) {
            match result {
                Ok(frame) => self.handle_frame(&frame),
                Err(error) => {
                    IngestStats::bump(&self.stats.frame_errors);
                    warn!(
                        target: INGEST_TARGET,
                        error = %error,
                        "discarding oversized frame"
                    );
                }
            }
        }
    }

    fn finish(&mut self) {
        if let Some(dropped) = self.framer.finish() {
            IngestStats::bump(&self.stats.frame_errors);
            warn!(
                target: INGEST_TARGET,
                bytes = dropped,
                "discarding unterminated input at end of stream"
            );
        }
    }
}
