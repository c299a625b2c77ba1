//! `goat-core` — typed registry resources.
//!
//! This crate holds the resource model only (no IO): the `Resource` trait,
//! the four entity types, and the JSON mapping rules they share.

pub mod authority;
pub mod concept;
pub mod error;
pub mod id;
pub mod identity;
pub mod identity_system;
pub mod resource;

pub use authority::Authority;
pub use concept::Concept;
pub use error::{DecodeError, DecodeResult};
pub use id::ResourceId;
pub use identity::{ConceptRef, Identity};
pub use identity_system::IdentitySystem;
pub use resource::{Resource, decode_object, parse_body};
