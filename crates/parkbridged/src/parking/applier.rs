//! Applies occupancy events to the zone index.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::protocol::ParkingEvent;

use super::{PARKING_TARGET, ParkingSpace, ParkingZoneIndex};

/// An event referenced a space the index does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupMiss {
    /// No zone carries the identifier.
    #[error("unknown parking zone '{zone_id}'")]
    UnknownZone {
        /// Identifier carried by the event.
        zone_id: String,
    },
    /// The zone exists but has fewer spaces than the index implies.
    #[error("parking zone '{zone_id}' has {len} spaces; index {index} is out of range")]
    IndexOutOfRange {
        /// Identifier carried by the event.
        zone_id: String,
        /// Index carried by the event.
        index: usize,
        /// Number of spaces in the zone.
        len: usize,
    },
}

/// Occupancy of a space before and after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Occupancy before the event.
    pub previous: bool,
    /// Occupancy after the event.
    pub current: bool,
}

impl Transition {
    /// Whether the event changed the space.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.previous != self.current
    }
}

impl ParkingZoneIndex {
    /// Sets the addressed space to occupied for `park` and free for `unpark`.
    ///
    /// Applying the same event again leaves the space unchanged. Unknown
    /// zones and out-of-range indices are logged and leave every space as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupMiss`] when the space does not exist.
    pub fn apply(&mut self, event: &ParkingEvent) -> Result<Transition, LookupMiss> {
        let space = match self.lookup_mut(event) {
            Ok(space) => space,
            Err(miss) => {
                warn!(
                    target: PARKING_TARGET,
                    zone = event.zone_id(),
                    index = event.index(),
                    action = %event.action(),
                    reason = %miss,
                    "lookup miss"
                );
                return Err(miss);
            }
        };

        let current = event.action().occupies();
        let previous = space.set_occupied(current);
        let transition = Transition { previous, current };
        if transition.changed() {
            info!(
                target: PARKING_TARGET,
                space = space.space_id(),
                kind = %space.kind(),
                marking = space.kind().marking_colour(),
                zone = event.zone_id(),
                index = event.index(),
                "space is now {}",
                if current { "occupied" } else { "free" }
            );
        } else {
            debug!(
                target: PARKING_TARGET,
                space = space.space_id(),
                occupied = current,
                "occupancy unchanged"
            );
        }
        Ok(transition)
    }

    fn lookup_mut(&mut self, event: &ParkingEvent) -> Result<&mut ParkingSpace, LookupMiss> {
        let spaces = self
            .zone_mut(event.zone_id())
            .ok_or_else(|| LookupMiss::UnknownZone {
                zone_id: event.zone_id().to_owned(),
            })?;
        let len = spaces.len();
        spaces
            .get_mut(event.index())
            .ok_or_else(|| LookupMiss::IndexOutOfRange {
                zone_id: event.zone_id().to_owned(),
                index: event.index(),
                len,
            })
    }
}
