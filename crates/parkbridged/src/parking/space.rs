//! A single addressable parking bay.

use parkbridge_config::ParkingType;

/// A single parking bay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingSpace {
    space_id: String,
    kind: ParkingType,
    occupied: bool,
}

impl ParkingSpace {
    /// Creates a free space.
    #[must_use]
    pub fn new(space_id: impl Into<String>, kind: ParkingType) -> Self {
        Self {
            space_id: space_id.into(),
            kind,
            occupied: false,
        }
    }

    /// Stable identifier used in logs.
    #[must_use]
    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    /// Bay kind.
    #[must_use]
    pub const fn kind(&self) -> ParkingType {
        self.kind
    }

    /// Whether a vehicle currently occupies the space.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Sets occupancy, returning the previous value.
    pub(crate) const fn set_occupied(&mut self, occupied: bool) -> bool {
        let previous = self.occupied;
        self.occupied = occupied;
        previous
    }
}
