//! Resource trait: one registry collection per entity type.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeResult};
use crate::id::ResourceId;

/// A typed entity living in one registry collection.
///
/// Implementors declare their collection endpoint and create fields as
/// constants, and own the mapping between JSON and the typed struct.
pub trait Resource: Sized + Send + core::fmt::Debug {
    /// Collection path segment, without slashes (e.g. `"concept"`).
    const ENDPOINT: &'static str;

    /// Field names sent in the body of a create call. Never includes `id`.
    const CREATE_FIELDS: &'static [&'static str];

    /// Server-assigned id; `None` until the resource has been created.
    fn id(&self) -> Option<ResourceId>;

    /// Build an instance from one decoded JSON object.
    ///
    /// Missing optional fields map to their unset state. A value that is not
    /// an object, or a present field of the wrong type, is a `DecodeError`.
    fn from_json(value: &Value) -> DecodeResult<Self>;

    /// Create payload: only fields listed in `CREATE_FIELDS` that are set.
    fn to_json(&self) -> Value;

    /// Merge a create response into `self` in place.
    ///
    /// The id is always taken from `created`; other fields are overwritten
    /// only when the response carries them.
    fn absorb(&mut self, created: Self);

    /// Collection path with surrounding slashes, e.g. `/concept/`.
    fn collection_path() -> String {
        format!("/{}/", Self::ENDPOINT)
    }

    /// Decode a JSON array into typed instances, preserving server order.
    ///
    /// The first element that fails to decode fails the whole list.
    fn decode_list(value: &Value) -> DecodeResult<Vec<Self>> {
        let items = value.as_array().ok_or(DecodeError::NotAnArray {
            resource: Self::ENDPOINT,
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Self::from_json(item).map_err(|source| DecodeError::Element {
                    resource: Self::ENDPOINT,
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }
}

/// Parse a raw response body into JSON.
pub fn parse_body(body: &str) -> DecodeResult<Value> {
    serde_json::from_str(body).map_err(DecodeError::invalid_json)
}

/// Deserialize a JSON object into `T`, failing closed on non-objects.
pub fn decode_object<T: DeserializeOwned>(resource: &'static str, value: &Value) -> DecodeResult<T> {
    if !value.is_object() {
        return Err(DecodeError::NotAnObject { resource });
    }
    T::deserialize(value).map_err(|e| DecodeError::malformed(resource, e))
}

/// Builder for create payloads.
#[derive(Debug, Default)]
pub(crate) struct CreateBody(Map<String, Value>);

impl CreateBody {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub(crate) fn optional<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self,
        }
    }

    pub(crate) fn finish(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_body_rejects_garbage() {
        let err = parse_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
    }

    #[test]
    fn create_body_skips_unset_optionals() {
        let body = CreateBody::new()
            .field("name", "x".to_string())
            .optional::<String>("description", None)
            .optional("part_of", Some(ResourceId::new(4)))
            .finish();

        assert_eq!(body, json!({ "name": "x", "part_of": 4 }));
    }
}
