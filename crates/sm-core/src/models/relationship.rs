//! Relationship model for the catalog graph.
//!
//! A relationship is a directed, typed edge between two entities. Every edge
//! is materialized together with its opposite-direction twin; the two records
//! reference each other through `pair_id` and are created and removed as one
//! unit by the graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of relationship types. Types come in opposite-direction
/// pairs; the pairing itself lives in the schema table, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Source calls the target API.
    ConsumesApi,
    /// Target calls this API.
    ApiConsumedBy,
    /// Source needs the target to function.
    DependsOn,
    /// Target needs this entity to function.
    DependencyOf,
    /// Source sits below the target in a hierarchy.
    ChildOf,
    /// Target sits below this entity in a hierarchy.
    ParentOf,
    /// Source belongs to the target team.
    MemberOf,
    /// Target belongs to this team.
    HasMember,
    /// Source is owned by the target team.
    OwnedBy,
    /// Target is owned by this team.
    OwnerOf,
    /// Source runs on the target infrastructure.
    DeployedOn,
    /// Target runs on this infrastructure.
    Hosts,
    /// Source is a component of the target.
    PartOf,
    /// Target is a component of this entity.
    HasPart,
    /// Source realizes the target API contract.
    Implements,
    /// Target realizes this API contract.
    ImplementedBy,
}

impl RelationshipType {
    /// Every relationship type. Exhaustive table checks iterate this.
    pub const ALL: [RelationshipType; 16] = [
        RelationshipType::ConsumesApi,
        RelationshipType::ApiConsumedBy,
        RelationshipType::DependsOn,
        RelationshipType::DependencyOf,
        RelationshipType::ChildOf,
        RelationshipType::ParentOf,
        RelationshipType::MemberOf,
        RelationshipType::HasMember,
        RelationshipType::OwnedBy,
        RelationshipType::OwnerOf,
        RelationshipType::DeployedOn,
        RelationshipType::Hosts,
        RelationshipType::PartOf,
        RelationshipType::HasPart,
        RelationshipType::Implements,
        RelationshipType::ImplementedBy,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RelationshipType::ConsumesApi => "Consumes API",
            RelationshipType::ApiConsumedBy => "API Consumed By",
            RelationshipType::DependsOn => "Depends On",
            RelationshipType::DependencyOf => "Dependency Of",
            RelationshipType::ChildOf => "Child Of",
            RelationshipType::ParentOf => "Parent Of",
            RelationshipType::MemberOf => "Member Of",
            RelationshipType::HasMember => "Has Member",
            RelationshipType::OwnedBy => "Owned By",
            RelationshipType::OwnerOf => "Owner Of",
            RelationshipType::DeployedOn => "Deployed On",
            RelationshipType::Hosts => "Hosts",
            RelationshipType::PartOf => "Part Of",
            RelationshipType::HasPart => "Has Part",
            RelationshipType::Implements => "Implements",
            RelationshipType::ImplementedBy => "Implemented By",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A directed, typed edge between two catalog entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// Entity the edge starts from.
    pub source_id: Uuid,
    /// Entity the edge points to.
    pub target_id: Uuid,
    /// Type of the edge.
    pub relationship_type: RelationshipType,
    /// The materialized opposite-direction record of this edge.
    pub pair_id: Uuid,
    /// When the pair was created.
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    /// Returns true if this edge touches the given entity on either end.
    pub fn involves(&self, entity_id: Uuid) -> bool {
        self.source_id == entity_id || self.target_id == entity_id
    }

    /// Returns true if this is the exact (source, target, type) triple.
    pub fn matches(&self, source_id: Uuid, target_id: Uuid, ty: RelationshipType) -> bool {
        self.source_id == source_id && self.target_id == target_id && self.relationship_type == ty
    }
}
