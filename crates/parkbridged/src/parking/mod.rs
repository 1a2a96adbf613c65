//! Parking domain model owned by the host tick.
//!
//! The zone index is built once from the zone layout and afterwards only
//! mutated by [`ParkingZoneIndex::apply`], which the host runs while draining
//! the dispatch queue.

mod applier;
mod space;
mod zones;

pub use self::applier::{LookupMiss, Transition};
pub use self::space::ParkingSpace;
pub use self::zones::{ParkingZoneIndex, ZoneOccupancy};
pub use parkbridge_config::ParkingType;

const PARKING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::parking");
