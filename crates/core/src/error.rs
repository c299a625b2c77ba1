//! Decode error model.

use thiserror::Error;

/// Result type used when mapping registry JSON onto typed resources.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// A registry payload did not have the shape a resource needs.
///
/// Absent optional fields are never an error; only structural mismatches
/// (wrong container, wrong field type, unparseable body) end up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The body was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// A single resource was expected but the value was not a JSON object.
    #[error("expected a JSON object for `{resource}`")]
    NotAnObject { resource: &'static str },

    /// A collection was expected but the value was not a JSON array.
    #[error("expected a JSON array of `{resource}`")]
    NotAnArray { resource: &'static str },

    /// A field was present but could not be mapped onto the typed struct.
    #[error("invalid field `{field}`: {message}")]
    InvalidField { field: &'static str, message: String },

    /// The object could not be mapped onto the resource type.
    #[error("malformed `{resource}`: {message}")]
    Malformed {
        resource: &'static str,
        message: String,
    },

    /// An element of a collection failed to decode.
    #[error("element {index} of `{resource}` list: {source}")]
    Element {
        resource: &'static str,
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    /// A create response came back without a server-assigned id.
    #[error("response for `{resource}` carries no id")]
    MissingId { resource: &'static str },
}

impl DecodeError {
    pub fn invalid_json(err: impl core::fmt::Display) -> Self {
        Self::InvalidJson(err.to_string())
    }

    pub fn malformed(resource: &'static str, err: impl core::fmt::Display) -> Self {
        Self::Malformed {
            resource,
            message: err.to_string(),
        }
    }
}
