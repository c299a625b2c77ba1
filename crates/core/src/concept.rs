//! Concept: a thing identified by an external canonical URI.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeResult;
use crate::id::ResourceId;
use crate::resource::{CreateBody, Resource, decode_object};

/// Path segment of the free-text search endpoint under the concept collection.
pub const SEARCH_ENDPOINT: &str = "concept/search";

/// Path segment of the identical-concept lookup endpoint.
pub const IDENTICAL_ENDPOINT: &str = "identical";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Concept {
    #[serde(default)]
    id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    /// Canonical URI; the de-duplication key across the registry.
    pub identifier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub concept_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Concept {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            identifier: identifier.into(),
            description: None,
            concept_type: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_concept_type(mut self, concept_type: impl Into<String>) -> Self {
        self.concept_type = Some(concept_type.into());
        self
    }

    /// Two concepts are identical candidates when their identifiers match.
    pub fn is_identical_to(&self, other: &Concept) -> bool {
        self.identifier == other.identifier
    }
}

impl Resource for Concept {
    const ENDPOINT: &'static str = "concept";
    const CREATE_FIELDS: &'static [&'static str] =
        &["name", "identifier", "description", "concept_type"];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn from_json(value: &Value) -> DecodeResult<Self> {
        decode_object(Self::ENDPOINT, value)
    }

    fn to_json(&self) -> Value {
        CreateBody::new()
            .field("name", self.name.clone())
            .field("identifier", self.identifier.clone())
            .optional("description", self.description.clone())
            .optional("concept_type", self.concept_type.clone())
            .finish()
    }

    fn absorb(&mut self, created: Self) {
        self.id = created.id;
        if !created.name.is_empty() {
            self.name = created.name;
        }
        if !created.identifier.is_empty() {
            self.identifier = created.identifier;
        }
        if created.description.is_some() {
            self.description = created.description;
        }
        if created.concept_type.is_some() {
            self.concept_type = created.concept_type;
        }
        self.extra.extend(created.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeError;
    use serde_json::json;

    fn concept_json(id: u64, identifier: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Concept {id}"),
            "identifier": identifier,
            "authority": { "name": "VIAF" }
        })
    }

    #[test]
    fn collection_path_is_fixed() {
        assert_eq!(Concept::collection_path(), "/concept/");
    }

    #[test]
    fn unknown_fields_are_kept_in_extra() {
        let concept = Concept::from_json(&concept_json(1, "http://test.com/a/")).unwrap();
        assert_eq!(concept.extra.get("authority"), Some(&json!({ "name": "VIAF" })));
        assert_eq!(concept.description, None);
    }

    #[test]
    fn identifier_is_required() {
        let err = Concept::from_json(&json!({ "id": 1, "name": "nameless" })).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { resource: "concept", .. }));
    }

    #[test]
    fn non_object_fails_closed() {
        let err = Concept::from_json(&json!("http://test.com/a/")).unwrap_err();
        assert_eq!(err, DecodeError::NotAnObject { resource: "concept" });
    }

    #[test]
    fn decode_list_preserves_order() {
        let payload = json!([
            concept_json(3, "http://test.com/c/"),
            concept_json(1, "http://test.com/a/"),
            concept_json(2, "http://test.com/b/"),
        ]);

        let ids: Vec<_> = Concept::decode_list(&payload)
            .unwrap()
            .iter()
            .map(|c| c.id().map(|id| id.get()))
            .collect();

        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn decode_list_reports_the_failing_element() {
        let payload = json!([concept_json(1, "http://test.com/a/"), 42]);
        let err = Concept::decode_list(&payload).unwrap_err();
        assert!(matches!(err, DecodeError::Element { index: 1, .. }));
    }

    #[test]
    fn decode_list_requires_an_array() {
        let err = Concept::decode_list(&json!({ "results": [] })).unwrap_err();
        assert_eq!(err, DecodeError::NotAnArray { resource: "concept" });
    }

    #[test]
    fn create_payload_only_uses_create_fields() {
        let concept = Concept::new("GoatTest", "http://test.com/test3/").with_concept_type("E21");
        let body = concept.to_json();
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();

        for key in &keys {
            assert!(Concept::CREATE_FIELDS.contains(&key.as_str()), "unexpected key {key}");
        }
        assert!(!keys.iter().any(|k| k == "id"));
    }

    #[test]
    fn identical_candidates_share_identifier() {
        let a = Concept::new("A", "http://test.com/test3/");
        let b = Concept::new("B", "http://test.com/test3/");
        let c = Concept::new("A", "http://test.com/other/");
        assert!(a.is_identical_to(&b));
        assert!(!a.is_identical_to(&c));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: one typed concept per array element, in server order.
            #[test]
            fn decode_list_is_one_to_one(ids in proptest::collection::vec(0u64..10_000, 0..40)) {
                let payload = Value::Array(
                    ids.iter()
                        .map(|id| concept_json(*id, &format!("http://test.com/{id}/")))
                        .collect(),
                );

                let concepts = Concept::decode_list(&payload).unwrap();
                let decoded: Vec<u64> = concepts
                    .iter()
                    .filter_map(|c| c.id().map(|id| id.get()))
                    .collect();

                prop_assert_eq!(decoded, ids);
            }
        }
    }
}
