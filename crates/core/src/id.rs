//! Server-assigned resource identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Identifier of a registry resource.
///
/// Always assigned by the registry in the response to a create call; the
/// client never mints one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ResourceId> for u64 {
    fn from(value: ResourceId) -> Self {
        value.0
    }
}

impl From<ResourceId> for serde_json::Value {
    fn from(value: ResourceId) -> Self {
        serde_json::Value::from(value.0)
    }
}

impl FromStr for ResourceId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().parse::<u64>().map_err(|e| DecodeError::InvalidField {
            field: "id",
            message: format!("{s:?}: {e}"),
        })?;
        Ok(Self(raw))
    }
}
