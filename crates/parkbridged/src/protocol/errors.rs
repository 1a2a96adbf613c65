//! Error types for message parsing.

use thiserror::Error;

/// Reasons a framed line was rejected.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is not valid JSON.
    #[error("malformed message: {message}")]
    Malformed {
        /// Parser description of the problem.
        message: String,
        /// Underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The line is valid JSON but not an object.
    #[error("message is not a JSON object")]
    NotAnObject,

    /// A required field is absent or null.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// The action is not one of `park` or `unpark`.
    #[error("invalid action '{0}'")]
    InvalidAction(String),

    /// The parking area identifier is empty or not a string.
    #[error("invalid parking area id '{0}'")]
    InvalidZone(String),

    /// The space index is not a non-negative integer.
    #[error("invalid parking index '{0}'")]
    InvalidIndex(String),
}

impl ParseError {
    /// Creates a malformed message error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Short machine-friendly label used in structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "malformed",
            Self::NotAnObject => "not_an_object",
            Self::MissingField(_) => "missing_field",
            Self::InvalidAction(_) => "invalid_action",
            Self::InvalidZone(_) => "invalid_zone",
            Self::InvalidIndex(_) => "invalid_index",
        }
    }
}
