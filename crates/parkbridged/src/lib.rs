//! Bridge between a traffic simulator and a parking visualisation host.
//!
//! A single producer connects over TCP and streams newline-delimited JSON
//! parking events. The [`transport::Acceptor`] reads the stream on a dedicated
//! thread and hands raw bytes to [`EventIngest`], which frames them with a
//! [`framer::Framer`], parses each line into a [`ParkingEvent`] and enqueues a
//! task on the [`DispatchQueue`]. The [`Host`] owns the [`ParkingZoneIndex`]
//! and drains the queue once per tick, so the parking model is only ever
//! mutated on the host thread.
//!
//! Malformed lines, unknown zones and out-of-range indices are logged and
//! skipped. None of them interrupt the stream or leave the model partially
//! updated.

mod bootstrap;
pub mod dispatch;
pub mod framer;
mod health;
pub mod host;
mod ingest;
pub mod parking;
pub mod protocol;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{DispatchQueue, DrainReport, EnqueueError, Enqueuer, TaskError};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use host::Host;
pub use ingest::{EventIngest, IngestSnapshot, IngestStats};
pub use parking::{LookupMiss, ParkingSpace, ParkingZoneIndex, Transition};
pub use protocol::{Action, ParkingEvent, ParseError};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
