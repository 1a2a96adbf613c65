//! Index from parking area identifiers to their ordered spaces.

use std::collections::BTreeMap;

use parkbridge_config::ZoneLayout;

use super::ParkingSpace;

/// Occupied and total space counts for one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOccupancy {
    /// Parking area identifier.
    pub zone_id: String,
    /// Spaces currently occupied.
    pub occupied: usize,
    /// Spaces in the zone.
    pub total: usize,
}

/// Parking spaces addressable by `(zone, index)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParkingZoneIndex {
    zones: BTreeMap<String, Vec<ParkingSpace>>,
}

impl ParkingZoneIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds free spaces for every zone in the layout.
    ///
    /// Space identifiers take the form `{area_id}-{index}`.
    #[must_use]
    pub fn from_layout(layout: &ZoneLayout) -> Self {
        let mut index = Self::new();
        for zone in &layout.zones {
            let spaces = zone
                .spaces
                .iter()
                .enumerate()
                .map(|(position, kind)| {
                    ParkingSpace::new(format!("{}-{position}", zone.area_id), *kind)
                })
                .collect();
            index.insert_zone(zone.area_id.clone(), spaces);
        }
        index
    }

    /// Adds or replaces a zone, returning the spaces it replaced.
    pub fn insert_zone(
        &mut self,
        zone_id: impl Into<String>,
        spaces: Vec<ParkingSpace>,
    ) -> Option<Vec<ParkingSpace>> {
        self.zones.insert(zone_id.into(), spaces)
    }

    /// Spaces of a zone in index order.
    #[must_use]
    pub fn zone(&self, zone_id: &str) -> Option<&[ParkingSpace]> {
        self.zones.get(zone_id).map(Vec::as_slice)
    }

    /// Looks up a single space.
    #[must_use]
    pub fn space(&self, zone_id: &str, index: usize) -> Option<&ParkingSpace> {
        self.zones.get(zone_id).and_then(|spaces| spaces.get(index))
    }

    pub(super) fn zone_mut(&mut self, zone_id: &str) -> Option<&mut Vec<ParkingSpace>> {
        self.zones.get_mut(zone_id)
    }

    /// Number of zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of spaces across all zones.
    #[must_use]
    pub fn space_count(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }

    /// Per-zone occupancy in zone identifier order.
    #[must_use]
    pub fn occupancy(&self) -> Vec<ZoneOccupancy> {
        self.zones
            .iter()
            .map(|(zone_id, spaces)| ZoneOccupancy {
                zone_id: zone_id.clone(),
                occupied: spaces.iter().filter(|space| space.is_occupied()).count(),
                total: spaces.len(),
            })
            .collect()
    }
}
