//! Compiled defaults shared by the daemon and its tests.

use crate::logging::LogFormat;

/// Interface the acceptor binds to when none is configured.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

/// Port the traffic simulator connects to.
pub const DEFAULT_LISTEN_PORT: u16 = 9000;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Host tick period in milliseconds (roughly 60 Hz).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

/// Largest unterminated frame the framer will buffer.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;

/// Pending task bound for the dispatch queue; `0` disables the bound.
pub const DEFAULT_QUEUE_CAPACITY: usize = 65_536;

/// Owned listen host used where allocation is required (e.g. serde).
pub fn default_listen_host() -> String {
    DEFAULT_LISTEN_HOST.to_owned()
}

/// Default listen port.
pub const fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

/// Default log filter expression used by the daemon.
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default host tick period.
pub const fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

/// Default frame bound.
pub const fn default_max_frame_bytes() -> usize {
    DEFAULT_MAX_FRAME_BYTES
}

/// Default dispatch queue bound.
pub const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
