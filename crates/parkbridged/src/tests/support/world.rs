//! BDD test world: owns the loader, reporter, bootstrapped daemon, running
//! host and the simulated producer connection.

use std::cell::RefCell;
use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, bootstrap_with};
use crate::dispatch::DrainReport;
use crate::host::Host;
use crate::parking::ParkingZoneIndex;
use crate::transport::wait_until;

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;

/// Scenario world shared across BDD steps.
pub struct BridgeWorld {
    loader: Box<dyn ConfigLoader>,
    pub reporter: Arc<RecordingHealthReporter>,
    daemon: Option<Daemon>,
    bootstrap_error: Option<BootstrapError>,
    host: Option<Host>,
    producer: Option<TcpStream>,
    sent_lines: u64,
    baseline: Option<ParkingZoneIndex>,
    last_report: Option<DrainReport>,
}

impl BridgeWorld {
    /// Builds a world with a successful configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            reporter: Arc::new(RecordingHealthReporter::default()),
            daemon: None,
            bootstrap_error: None,
            host: None,
            producer: None,
            sent_lines: 0,
            baseline: None,
            last_report: None,
        }
    }

    /// Replaces the configuration loader.
    pub fn use_loader(&mut self, loader: impl ConfigLoader + 'static) {
        self.loader = Box::new(loader);
        self.daemon = None;
        self.bootstrap_error = None;
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.use_loader(FailingConfigLoader);
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.daemon.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        match bootstrap_with(&*self.loader, self.reporter.clone()) {
            Ok(daemon) => self.daemon = Some(daemon),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Returns whether bootstrap produced an error.
    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    /// Returns the bootstrapped daemon, if any.
    #[must_use]
    pub fn daemon(&self) -> Option<&Daemon> {
        self.daemon.as_ref()
    }

    /// Bootstraps, converts the daemon into a host and starts listening.
    pub fn start_bridge(&mut self) {
        self.bootstrap();
        let daemon = self.daemon.take().expect("bootstrap should succeed");
        let mut host = daemon.into_host();
        host.start_acceptor().expect("acceptor should start");
        self.host = Some(host);
    }

    /// Connects the simulated producer to the running bridge.
    pub fn connect_producer(&mut self) {
        let addr = self
            .host()
            .local_addr()
            .expect("acceptor should be listening");
        let stream = TcpStream::connect(addr).expect("connect producer");
        self.producer = Some(stream);
    }

    /// Writes raw text in a single call and records how many lines it holds.
    pub fn send(&mut self, text: &str) {
        let producer = self.producer.as_mut().expect("producer should be connected");
        producer.write_all(text.as_bytes()).expect("write to bridge");
        producer.flush().expect("flush producer");
        self.sent_lines += u64::try_from(text.matches('\n').count()).expect("line count");
    }

    /// Closes the producer connection.
    pub fn disconnect_producer(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.shutdown(Shutdown::Both).ok();
        }
    }

    /// Remembers the current zone index for later comparison.
    pub fn capture_baseline(&mut self) {
        self.baseline = Some(self.host().zones().clone());
    }

    /// Waits until every sent line has been handled by the reader thread and
    /// then runs exactly one host tick.
    pub fn settle(&mut self) {
        let expected = self.sent_lines;
        let stats = self.host().stats();
        let handled = wait_until(|| {
            let snapshot = stats.snapshot();
            snapshot.frames >= expected
                && snapshot.frames
                    == snapshot.events + snapshot.parse_failures + snapshot.rejected
        });
        assert!(handled, "reader did not handle {expected} lines");
        let report = self.host_mut().tick();
        self.last_report = Some(report);
    }

    /// Runs one host tick.
    pub fn tick(&mut self) -> DrainReport {
        self.host_mut().tick()
    }

    /// Ticks the host until `condition` holds or the deadline passes.
    pub fn tick_until(&mut self, mut condition: impl FnMut(&Self) -> bool) -> bool {
        wait_until(|| {
            self.host_mut().tick();
            condition(self)
        })
    }

    /// Report from the most recent settling tick.
    #[must_use]
    pub fn last_report(&self) -> DrainReport {
        self.last_report.expect("no tick has run")
    }

    /// Zone index captured by [`Self::capture_baseline`].
    #[must_use]
    pub fn baseline(&self) -> &ParkingZoneIndex {
        self.baseline.as_ref().expect("baseline not captured")
    }

    /// Running host.
    #[must_use]
    pub fn host(&self) -> &Host {
        self.host.as_ref().expect("bridge should be running")
    }

    fn host_mut(&mut self) -> &mut Host {
        self.host.as_mut().expect("bridge should be running")
    }
}

impl Default for BridgeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BridgeWorld {
    fn drop(&mut self) {
        self.disconnect_producer();
        if let Some(host) = self.host.as_mut() {
            host.stop();
        }
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<BridgeWorld> {
    RefCell::new(BridgeWorld::new())
}
