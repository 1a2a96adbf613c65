//! Typed occupancy events.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{ACTION_FIELD, AREA_FIELD, INDEX_FIELD, ParseError};

/// Occupancy change requested by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// A vehicle started parking in the space.
    Park,
    /// A vehicle left the space.
    Unpark,
}

impl Action {
    /// Wire spelling of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Park => "park",
            Self::Unpark => "unpark",
        }
    }

    /// Occupancy the space holds once the action is applied.
    #[must_use]
    pub const fn occupies(self) -> bool {
        matches!(self, Self::Park)
    }

    fn from_value(value: &Value) -> Result<Self, ParseError> {
        match value {
            Value::String(text) => match text.trim() {
                "park" => Ok(Self::Park),
                "unpark" => Ok(Self::Unpark),
                other => Err(ParseError::InvalidAction(other.to_owned())),
            },
            other => Err(ParseError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Immutable occupancy event for one space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParkingEvent {
    action: Action,
    #[serde(rename = "parking_area_id")]
    zone_id: String,
    #[serde(rename = "parking_index")]
    index: usize,
}

impl ParkingEvent {
    /// Builds an event from its parts.
    #[must_use]
    pub fn new(action: Action, zone_id: impl Into<String>, index: usize) -> Self {
        Self {
            action,
            zone_id: zone_id.into(),
            index,
        }
    }

    /// Requested action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Parking area the space belongs to.
    #[must_use]
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// Position of the space within its area.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Parses a trimmed message line.
    ///
    /// Field order and unknown fields are irrelevant. String values are
    /// trimmed, and the index may be sent either as a JSON number or as a
    /// string of ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` when a required field is absent,
    /// before any field value is validated.
    pub fn parse(message: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(message).map_err(ParseError::from_json_error)?;
        let Value::Object(mut fields) = value else {
            return Err(ParseError::NotAnObject);
        };

        let action = take_field(&mut fields, ACTION_FIELD)?;
        let zone = take_field(&mut fields, AREA_FIELD)?;
        let index = take_field(&mut fields, INDEX_FIELD)?;

        Ok(Self {
            action: Action::from_value(&action)?,
            zone_id: zone_from_value(&zone)?,
            index: index_from_value(&index)?,
        })
    }

    /// Renders the minimal wire line for this event, delimiter included.
    ///
    /// # Errors
    ///
    /// Propagates serialisation failures from `serde_json`.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

impl fmt::Display for ParkingEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}[{}]", self.action, self.zone_id, self.index)
    }
}

fn take_field(fields: &mut Map<String, Value>, name: &'static str) -> Result<Value, ParseError> {
    fields
        .remove(name)
        .filter(|value| !value.is_null())
        .ok_or(ParseError::MissingField(name))
}

fn zone_from_value(value: &Value) -> Result<String, ParseError> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        other => Err(ParseError::InvalidZone(other.to_string())),
    }
}

fn index_from_value(value: &Value) -> Result<usize, ParseError> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .ok_or_else(|| ParseError::InvalidIndex(number.to_string())),
        Value::String(text) => parse_digits(text.trim()),
        other => Err(ParseError::InvalidIndex(other.to_string())),
    }
}

fn parse_digits(text: &str) -> Result<usize, ParseError> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ParseError::InvalidIndex(text.to_owned()));
    }
    text.parse()
        .map_err(|_| ParseError::InvalidIndex(text.to_owned()))
}
