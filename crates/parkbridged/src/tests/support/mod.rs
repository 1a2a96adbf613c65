//! Test harness utilities for the bridge behavioural suites.

mod config_loader;
mod reporter;
mod world;

pub use config_loader::{DUPLICATE_LAYOUT, FailingConfigLoader, TestConfigLoader};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{BridgeWorld, world};
