//! Data models for catalog entities, attributes, and relationships.

pub mod attribute;
pub mod entity;
pub mod relationship;

pub use attribute::{AttributeType, AttributeTypeError, KindSpec, ScalarKind, KIND_SPECS};
pub use entity::{AttributeValue, Entity, EntityKind};
pub use relationship::{Relationship, RelationshipType};
