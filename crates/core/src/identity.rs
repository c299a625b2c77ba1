//! Identity: a set of concepts asserted to denote the same thing.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeResult;
use crate::id::ResourceId;
use crate::resource::{CreateBody, Resource, decode_object};

/// Reference to a concept, either by canonical identifier or registry id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum ConceptRef {
    Id(ResourceId),
    Identifier(String),
}

impl From<&str> for ConceptRef {
    fn from(value: &str) -> Self {
        Self::Identifier(value.to_string())
    }
}

impl From<String> for ConceptRef {
    fn from(value: String) -> Self {
        Self::Identifier(value)
    }
}

impl From<ResourceId> for ConceptRef {
    fn from(value: ResourceId) -> Self {
        Self::Id(value)
    }
}

impl From<ConceptRef> for Value {
    fn from(value: ConceptRef) -> Self {
        match value {
            ConceptRef::Id(id) => id.into(),
            ConceptRef::Identifier(uri) => Value::String(uri),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identity {
    #[serde(default)]
    id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    /// Member concepts, in the order they were asserted.
    #[serde(default)]
    pub concepts: Vec<ConceptRef>,
    /// Identity system this identity belongs to.
    #[serde(default)]
    pub part_of: Option<ResourceId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    pub fn new<I, C>(name: impl Into<String>, concepts: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ConceptRef>,
    {
        Self {
            id: None,
            name: name.into(),
            concepts: concepts.into_iter().map(Into::into).collect(),
            part_of: None,
            extra: Map::new(),
        }
    }

    pub fn part_of(mut self, system: ResourceId) -> Self {
        self.part_of = Some(system);
        self
    }
}

impl Resource for Identity {
    const ENDPOINT: &'static str = "identity";
    const CREATE_FIELDS: &'static [&'static str] = &["name", "concepts", "part_of"];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn from_json(value: &Value) -> DecodeResult<Self> {
        decode_object(Self::ENDPOINT, value)
    }

    fn to_json(&self) -> Value {
        CreateBody::new()
            .field("name", self.name.clone())
            .field("concepts", self.concepts.clone())
            .optional("part_of", self.part_of)
            .finish()
    }

    fn absorb(&mut self, created: Self) {
        self.id = created.id;
        if !created.name.is_empty() {
            self.name = created.name;
        }
        if !created.concepts.is_empty() {
            self.concepts = created.concepts;
        }
        if created.part_of.is_some() {
            self.part_of = created.part_of;
        }
        self.extra.extend(created.extra);
    }
}
