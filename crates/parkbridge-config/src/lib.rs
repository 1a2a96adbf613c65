//! Shared configuration for the parking event bridge.
//!
//! Configuration is layered by [`ortho_config`]: compiled defaults, then a
//! TOML file (`--config-path` or `PARKBRIDGE_CONFIG_PATH`), then
//! `PARKBRIDGE_*` environment variables, and finally command-line flags.

mod defaults;
mod layout;
mod logging;

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT, DEFAULT_LOG_FILTER, DEFAULT_MAX_FRAME_BYTES,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TICK_INTERVAL_MS, default_listen_host, default_listen_port,
    default_log_filter, default_log_filter_string, default_log_format, default_max_frame_bytes,
    default_queue_capacity, default_tick_interval_ms,
};
pub use layout::{LayoutError, ParkingType, ZoneLayout, ZoneSpec};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, OrthoConfig)]
#[ortho_config(prefix = "PARKBRIDGE")]
pub struct Config {
    /// Interface the acceptor binds to.
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    /// TCP port the simulator connects to.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log lines.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// JSON file describing the parking zones.
    #[serde(default)]
    pub zone_layout: Option<Utf8PathBuf>,
    /// Host tick period in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Bound on a single unterminated frame.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
    /// Bound on pending dispatch tasks; `0` disables the bound.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Listen again with a fresh acceptor after the producer disconnects.
    #[serde(default)]
    pub relisten: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            zone_layout: None,
            tick_interval_ms: default_tick_interval_ms(),
            max_frame_bytes: default_max_frame_bytes(),
            queue_capacity: default_queue_capacity(),
            relisten: false,
        }
    }
}

impl Config {
    /// Interface the acceptor binds to.
    #[must_use]
    pub fn listen_host(&self) -> &str {
        &self.listen_host
    }

    /// TCP port the simulator connects to.
    #[must_use]
    pub const fn listen_port(&self) -> u16 {
        self.listen_port
    }

    /// Bind address rendered as `host:port`.
    #[must_use]
    pub fn listen_addr(&self) -> ListenAddr<'_> {
        ListenAddr {
            host: &self.listen_host,
            port: self.listen_port,
        }
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format for log lines.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Path of the zone layout file, when configured.
    #[must_use]
    pub fn zone_layout(&self) -> Option<&Utf8Path> {
        self.zone_layout.as_deref()
    }

    /// Host tick period in milliseconds.
    #[must_use]
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Bound on a single unterminated frame.
    #[must_use]
    pub const fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }

    /// Bound on pending dispatch tasks, or `None` when unbounded.
    #[must_use]
    pub const fn queue_capacity(&self) -> Option<usize> {
        match self.queue_capacity {
            0 => None,
            capacity => Some(capacity),
        }
    }

    /// Whether a fresh acceptor is started after a disconnect.
    #[must_use]
    pub const fn relisten(&self) -> bool {
        self.relisten
    }
}

/// Borrowed `host:port` pair accepted by [`std::net::ToSocketAddrs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenAddr<'a> {
    /// Host name or address literal.
    pub host: &'a str,
    /// TCP port.
    pub port: u16,
}

impl fmt::Display for ListenAddr<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}
