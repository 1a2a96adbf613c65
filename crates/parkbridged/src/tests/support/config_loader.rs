//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::fs;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use parkbridge_config::Config;

use crate::bootstrap::ConfigLoader;

/// Zone layout written by [`TestConfigLoader`]: `zone_a` has three spaces and
/// `zone_b` has two.
pub const TEST_LAYOUT: &str = r#"{
  "zones": [
    {"area_id": "zone_a", "spaces": ["standard", "standard", "accessible"]},
    {"area_id": "zone_b", "spaces": ["ev", "standard"]}
  ]
}"#;

/// Layout declaring `zone_a` twice.
pub const DUPLICATE_LAYOUT: &str = r#"{
  "zones": [
    {"area_id": "zone_a", "spaces": ["standard"]},
    {"area_id": "zone_a", "spaces": ["ev"]}
  ]
}"#;

/// Loader that writes a zone layout into a temporary directory and binds an
/// ephemeral loopback port.
pub struct TestConfigLoader {
    _dir: TempDir,
    config: Config,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(TEST_LAYOUT)
    }

    /// Builds a loader whose layout file contains `contents`.
    #[must_use]
    pub fn with_layout(contents: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temporary directory for layout");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("zones.json"))
            .expect("temporary layout path was not valid UTF-8");
        fs::write(&path, contents).expect("write zone layout");
        Self {
            _dir: dir,
            config: Config {
                listen_host: String::from("127.0.0.1"),
                listen_port: 0,
                zone_layout: Some(path),
                tick_interval_ms: 1,
                ..Config::default()
            },
        }
    }

    /// Builds a loader pointing at a layout file that does not exist.
    #[must_use]
    pub fn with_missing_layout() -> Self {
        let mut loader = Self::new();
        loader.config.zone_layout = loader
            .config
            .zone_layout
            .as_ref()
            .map(|path| path.with_file_name("missing.json"));
        loader
    }

    /// Configuration this loader returns.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Loader that intentionally fails by passing an invalid port on the CLI.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("parkbridged"),
            OsString::from("--listen-port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}
