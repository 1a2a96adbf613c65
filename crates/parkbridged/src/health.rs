//! Structured health reporting for bridge lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use parkbridge_config::Config;

use crate::bootstrap::BootstrapError;
use crate::ingest::IngestSnapshot;
use crate::parking::ParkingZoneIndex;
use crate::transport::AcceptorError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config, zones: &ParkingZoneIndex);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once an acceptor is listening.
    fn acceptor_listening(&self, addr: SocketAddr);

    /// Invoked when an acceptor fails to start.
    fn acceptor_failed(&self, error: &AcceptorError);

    /// Invoked once when an acceptor reaches `Closed`.
    fn acceptor_closed(&self, stats: &IngestSnapshot);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config, zones: &ParkingZoneIndex) {
        (**self).bootstrap_succeeded(config, zones);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn acceptor_listening(&self, addr: SocketAddr) {
        (**self).acceptor_listening(addr);
    }

    fn acceptor_failed(&self, error: &AcceptorError) {
        (**self).acceptor_failed(error);
    }

    fn acceptor_closed(&self, stats: &IngestSnapshot) {
        (**self).acceptor_closed(stats);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting bridge bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config, zones: &ParkingZoneIndex) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            listen = %config.listen_addr(),
            zones = zones.zone_count(),
            spaces = zones.space_count(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "bridge bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "bridge bootstrap failed"
        );
    }

    fn acceptor_listening(&self, addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "acceptor_listening",
            addr = %addr,
            "waiting for simulator connection"
        );
    }

    fn acceptor_failed(&self, error: &AcceptorError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "acceptor_failed",
            error = %error,
            "acceptor failed to start"
        );
    }

    fn acceptor_closed(&self, stats: &IngestSnapshot) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "acceptor_closed",
            events = stats.events,
            parse_failures = stats.parse_failures,
            frame_errors = stats.frame_errors,
            rejected = stats.rejected,
            lookup_misses = stats.lookup_misses,
            "simulator feed closed"
        );
    }
}
