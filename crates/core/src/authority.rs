//! Authority: an organisation that mints identifiers for concepts.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeResult;
use crate::id::ResourceId;
use crate::resource::{CreateBody, Resource, decode_object};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Authority {
    #[serde(default)]
    id: Option<ResourceId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Fields the registry returned that this type does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Authority {
    /// A not-yet-created authority.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: Some(description.into()),
            extra: Map::new(),
        }
    }
}

impl Resource for Authority {
    const ENDPOINT: &'static str = "authority";
    const CREATE_FIELDS: &'static [&'static str] = &["name", "description"];

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn from_json(value: &Value) -> DecodeResult<Self> {
        decode_object(Self::ENDPOINT, value)
    }

    fn to_json(&self) -> Value {
        CreateBody::new()
            .field("name", self.name.clone())
            .optional("description", self.description.clone())
            .finish()
    }

    fn absorb(&mut self, created: Self) {
        self.id = created.id;
        if !created.name.is_empty() {
            self.name = created.name;
        }
        if created.description.is_some() {
            self.description = created.description;
        }
        self.extra.extend(created.extra);
    }
}
