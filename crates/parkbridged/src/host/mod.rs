//! Host loop owning the parking model and the dispatch queue.
//!
//! The host is the only owner of [`ParkingZoneIndex`]. Producer events reach
//! it through the [`DispatchQueue`], which is drained once per tick on the
//! thread that called [`Host::run`] or [`Host::tick`].

pub mod shutdown;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use parkbridge_config::Config;

use crate::dispatch::{DispatchQueue, DrainReport, Enqueuer};
use crate::health::HealthReporter;
use crate::ingest::{EventIngest, IngestStats};
use crate::parking::{ParkingZoneIndex, ZoneOccupancy};
use crate::transport::{Acceptor, AcceptorError, AcceptorState};

const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

const RELISTEN_BACKOFF: Duration = Duration::from_secs(1);

/// Tick-driven consumer of producer events.
pub struct Host {
    config: Config,
    zones: ParkingZoneIndex,
    queue: DispatchQueue<ParkingZoneIndex>,
    stats: Arc<IngestStats>,
    reporter: Arc<dyn HealthReporter>,
    acceptor: Option<Acceptor>,
    closed_reported: bool,
    next_listen: Option<Instant>,
    last_occupancy: Vec<ZoneOccupancy>,
}

impl Host {
    /// Builds a host around an initial zone index.
    #[must_use]
    pub fn new(config: Config, zones: ParkingZoneIndex, reporter: Arc<dyn HealthReporter>) -> Self {
        let queue = DispatchQueue::new(config.queue_capacity());
        let last_occupancy = zones.occupancy();
        Self {
            config,
            zones,
            queue,
            stats: IngestStats::shared(),
            reporter,
            acceptor: None,
            closed_reported: false,
            next_listen: None,
            last_occupancy,
        }
    }

    /// Current parking model.
    #[must_use]
    pub const fn zones(&self) -> &ParkingZoneIndex {
        &self.zones
    }

    /// Counters updated by the reader thread.
    #[must_use]
    pub fn stats(&self) -> Arc<IngestStats> {
        Arc::clone(&self.stats)
    }

    /// Producer handle onto the host's dispatch queue.
    #[must_use]
    pub fn enqueuer(&self) -> Enqueuer<ParkingZoneIndex> {
        self.queue.enqueuer()
    }

    /// State of the current acceptor, if one has been started.
    #[must_use]
    pub fn acceptor_state(&self) -> Option<AcceptorState> {
        self.acceptor.as_ref().map(Acceptor::state)
    }

    /// Address of the current acceptor once it is listening.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.acceptor.as_ref().and_then(Acceptor::local_addr)
    }

    /// Replaces any existing acceptor with a fresh one and starts it.
    ///
    /// # Errors
    ///
    /// Returns the acceptor's start error after reporting it. The failed
    /// acceptor is retained in the `Closed` state.
    pub fn start_acceptor(&mut self) -> Result<SocketAddr, AcceptorError> {
        self.stop();
        let mut acceptor = Acceptor::from_config(&self.config);
        let sink = EventIngest::new(
            self.queue.enqueuer(),
            self.config.max_frame_bytes(),
            Arc::clone(&self.stats),
        );
        let started = acceptor.start(sink);
        self.acceptor = Some(acceptor);
        self.closed_reported = false;
        match started {
            Ok(addr) => {
                self.reporter.acceptor_listening(addr);
                Ok(addr)
            }
            Err(error) => {
                self.reporter.acceptor_failed(&error);
                // A failed start is reported through `acceptor_failed` only.
                self.closed_reported = true;
                Err(error)
            }
        }
    }

    /// Runs every queued task against the zone index.
    ///
    /// Also reports a closed acceptor once and, when `relisten` is set,
    /// starts a replacement after the producer has gone away.
    pub fn tick(&mut self) -> DrainReport {
        let report = self.drain();
        self.observe_acceptor();
        self.maybe_relisten();
        report
    }

    /// Drives the acceptor and the tick loop until `shutdown` is raised.
    ///
    /// A failed bind is reported and the loop keeps ticking without a
    /// producer, retrying later only when `relisten` is set.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        if self.start_acceptor().is_err() {
            self.schedule_relisten();
        }
        let interval = Duration::from_millis(self.config.tick_interval_ms());

        while !shutdown.load(Ordering::SeqCst) {
            let started = Instant::now();
            self.tick();
            if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }

        info!(target: HOST_TARGET, "shutdown requested");
        self.stop();
        self.drain();
        self.observe_acceptor();
        self.next_listen = None;
    }

    /// Stops the current acceptor and joins its reader thread.
    pub fn stop(&mut self) {
        let Some(acceptor) = self.acceptor.as_mut() else {
            return;
        };
        if let Err(error) = acceptor.stop() {
            warn!(target: HOST_TARGET, error = %error, "acceptor did not stop cleanly");
        }
    }

    fn drain(&mut self) -> DrainReport {
        let report = self.queue.drain_all(&mut self.zones);
        if !report.is_empty() {
            debug!(
                target: HOST_TARGET,
                executed = report.executed,
                failed = report.failed,
                panicked = report.panicked,
                "drained dispatch queue"
            );
            self.log_occupancy_change();
        }
        report
    }

    fn observe_acceptor(&mut self) {
        if self.closed_reported || self.acceptor_state() != Some(AcceptorState::Closed) {
            return;
        }
        self.closed_reported = true;
        self.reporter.acceptor_closed(&self.stats.snapshot());
        if self.config.relisten() {
            self.next_listen = Some(Instant::now());
        }
    }

    fn maybe_relisten(&mut self) {
        let Some(due) = self.next_listen else {
            return;
        };
        if Instant::now() < due {
            return;
        }
        self.next_listen = None;
        info!(target: HOST_TARGET, "listening for a new simulator connection");
        if self.start_acceptor().is_err() {
            self.schedule_relisten();
        }
    }

    fn schedule_relisten(&mut self) {
        if self.config.relisten() {
            self.next_listen = Some(Instant::now() + RELISTEN_BACKOFF);
        } else {
            warn!(
                target: HOST_TARGET,
                "no acceptor is listening; events will not arrive until restart"
            );
        }
    }

    fn log_occupancy_change(&mut self) {
        let occupancy = self.zones.occupancy();
        if occupancy == self.last_occupancy {
            return;
        }
        for zone in &occupancy {
            info!(
                target: HOST_TARGET,
                zone = %zone.zone_id,
                occupied = zone.occupied,
                total = zone.total,
                "zone occupancy"
            );
        }
        self.last_occupancy = occupancy;
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.stop();
    }
}
