//! # sm-core
//!
//! Core catalog model for ServiceMap: typed entity attributes, the
//! classification schema, the relationship graph with paired inverse edges,
//! storage traits, and the consistency validator that guards every write.
//!
//! Run [`schema::self_check`] once at process startup; it audits the static
//! schema tables exhaustively and a failure means the build is misconfigured
//! and must not serve traffic.

pub mod graph;
pub mod models;
pub mod schema;
pub mod store;
pub mod validation;

pub use graph::{CatalogGraph, GraphError, DEFAULT_TRAVERSAL_DEPTH};
pub use models::{
    AttributeType, AttributeTypeError, AttributeValue, Entity, EntityKind, Relationship,
    RelationshipType, ScalarKind,
};
pub use schema::{
    axes::ClassificationAxis, BudgetPosture, Level, SchemaError,
};
pub use store::{
    EntitySearchParams, EntityStore, InMemoryCatalogStore, RelationshipStore, StoreError,
    StoreResult,
};
pub use validation::{
    validate_entity_delete, validate_entity_write, validate_relationship_write, DeleteError,
    DeletePlan, EdgeEnd, RelationshipWriteError, ValidationError,
};
