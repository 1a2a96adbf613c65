//! Wire protocol spoken by the traffic simulator.
//!
//! Each framed line carries one flat JSON object:
//!
//! ```json
//! {"action": "park", "parking_area_id": "pa_0", "parking_index": 2}
//! ```
//!
//! Extra fields are ignored so the simulator can add context (vehicle ids,
//! positions) without breaking the bridge.

mod errors;
mod event;

pub use self::errors::ParseError;
pub use self::event::{Action, ParkingEvent};

/// Field carrying the occupancy action.
pub const ACTION_FIELD: &str = "action";
/// Field carrying the parking area identifier.
pub const AREA_FIELD: &str = "parking_area_id";
/// Field carrying the space index within the area.
pub const INDEX_FIELD: &str = "parking_index";

/// Parses one trimmed message into a [`ParkingEvent`].
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found; the caller is
/// expected to discard the line and continue with the next one.
pub fn parse(message: &str) -> Result<ParkingEvent, ParseError> {
    ParkingEvent::parse(message)
}
