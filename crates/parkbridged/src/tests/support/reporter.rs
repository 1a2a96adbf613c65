//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::net::SocketAddr;
use std::sync::Mutex;

use parkbridge_config::Config;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::ingest::IngestSnapshot;
use crate::parking::ParkingZoneIndex;
use crate::transport::AcceptorError;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started.
    BootstrapStarting,
    /// Bootstrap completed with the given zone and space counts.
    BootstrapSucceeded { zones: usize, spaces: usize },
    /// Bootstrap failed with an error description.
    BootstrapFailed(String),
    /// An acceptor started listening.
    AcceptorListening(SocketAddr),
    /// An acceptor failed to start.
    AcceptorFailed(String),
    /// An acceptor closed with the given counters.
    AcceptorClosed(IngestSnapshot),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Counts recorded `AcceptorClosed` events.
    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, HealthEvent::AcceptorClosed(_)))
            .count()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config, zones: &ParkingZoneIndex) {
        self.record(HealthEvent::BootstrapSucceeded {
            zones: zones.zone_count(),
            spaces: zones.space_count(),
        });
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn acceptor_listening(&self, addr: SocketAddr) {
        self.record(HealthEvent::AcceptorListening(addr));
    }

    fn acceptor_failed(&self, error: &AcceptorError) {
        self.record(HealthEvent::AcceptorFailed(error.to_string()));
    }

    fn acceptor_closed(&self, stats: &IngestSnapshot) {
        self.record(HealthEvent::AcceptorClosed(*stats));
    }
}
