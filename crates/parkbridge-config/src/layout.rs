//! Zone layout file describing which parking spaces exist in each zone.
//!
//! The layout is a JSON document listing every parking area reported by the
//! simulator together with the ordered kinds of its spaces. The position of a
//! space in its list is the index the simulator uses on the wire:
//!
//! ```json
//! {"zones": [{"area_id": "pa_0", "spaces": ["standard", "standard", "ev"]}]}
//! ```

use std::collections::HashSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Kind of a parking space, which also selects its bay marking.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParkingType {
    /// Regular bay.
    #[default]
    Standard,
    /// Bay reserved for accessible parking.
    Accessible,
    /// Bay with an electric vehicle charger.
    Ev,
}

impl ParkingType {
    /// Conventional marking colour for bays of this kind.
    #[must_use]
    pub const fn marking_colour(self) -> &'static str {
        match self {
            Self::Standard => "white",
            Self::Accessible => "blue",
            Self::Ev => "green",
        }
    }
}

/// One parking area and its ordered spaces.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZoneSpec {
    /// Area identifier used by the simulator (`parking_area_id`).
    pub area_id: String,
    /// Space kinds in index order.
    #[serde(default)]
    pub spaces: Vec<ParkingType>,
}

/// Complete zone layout loaded at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZoneLayout {
    /// Zones in declaration order.
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
}

/// Errors raised while loading a zone layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The layout file could not be read.
    #[error("failed to read zone layout '{path}': {source}")]
    Read {
        /// Layout file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The layout file is not valid layout JSON.
    #[error("failed to parse zone layout '{path}': {source}")]
    Parse {
        /// Layout file path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Two zones share an area identifier.
    #[error("zone '{area_id}' is declared more than once")]
    DuplicateZone {
        /// Repeated area identifier.
        area_id: String,
    },
}

impl ZoneLayout {
    /// Reads and validates a layout file.
    pub fn load(path: &Utf8Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: Self =
            serde_json::from_str(&contents).map_err(|source| LayoutError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Rejects layouts that declare the same area twice.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.area_id.as_str()) {
                return Err(LayoutError::DuplicateZone {
                    area_id: zone.area_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Total number of spaces across all zones.
    #[must_use]
    pub fn space_count(&self) -> usize {
        self.zones.iter().map(|zone| zone.spaces.len()).sum()
    }
}
