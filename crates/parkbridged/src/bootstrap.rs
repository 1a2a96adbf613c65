//! Bridge bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use parkbridge_config::{Config, LayoutError, ZoneLayout};

use crate::health::HealthReporter;
use crate::host::Host;
use crate::parking::ParkingZoneIndex;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the bridge configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps a ready-made configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The zone layout could not be loaded.
    #[error("failed to load zone layout: {source}")]
    Layout {
        /// Underlying layout error.
        #[source]
        source: LayoutError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Daemon {
    config: Config,
    zones: ParkingZoneIndex,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Zone index built from the configured layout.
    #[must_use]
    pub const fn zones(&self) -> &ParkingZoneIndex {
        &self.zones
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Hands the configuration and zone index to a new [`Host`].
    #[must_use]
    pub fn into_host(self) -> Host {
        Host::new(self.config, self.zones, self.reporter)
    }
}

/// Bootstraps the bridge using the supplied collaborators.
///
/// # Errors
///
/// Every failure is reported to `reporter` before it is returned.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let zones = match load_zones(&config) {
        Ok(zones) => zones,
        Err(source) => {
            let error = BootstrapError::Layout { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config, &zones);
    Ok(Daemon {
        config,
        zones,
        telemetry,
        reporter,
    })
}

fn load_zones(config: &Config) -> Result<ParkingZoneIndex, LayoutError> {
    match config.zone_layout() {
        Some(path) => ZoneLayout::load(path).map(|layout| ParkingZoneIndex::from_layout(&layout)),
        None => Ok(ParkingZoneIndex::new()),
    }
}
