//! Catalog consistency validation.
//!
//! The validator sits between the mutation path and storage: entity writes
//! are checked against the attribute type system and the axis tables,
//! relationship writes against the endpoint compatibility table and graph
//! invariants, and deletes against the dependency guard. Entity checks
//! collect every violation instead of failing fast, so a caller can surface
//! all problems at once.

use crate::graph::CatalogGraph;
use crate::models::attribute::{json_shape, AttributeType};
use crate::models::entity::Entity;
use crate::models::relationship::{Relationship, RelationshipType};
use crate::schema::axes::{level_by_code, ClassificationAxis};
use crate::schema::compatibility::endpoint_rule;
use thiserror::Error;
use uuid::Uuid;

/// A single problem with a proposed entity write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The entity name is empty or whitespace.
    #[error("entity name must not be blank")]
    BlankName,
    /// An attribute value does not match its declared type.
    #[error("attribute '{attribute}' expects {expected}, found {found}")]
    TypeMismatch {
        /// Attribute name.
        attribute: String,
        /// Declared type.
        expected: AttributeType,
        /// Shape of the offending value.
        found: String,
    },
    /// An axis assignment references a code the axis does not define.
    #[error("axis {axis} has no level '{code}'")]
    UnknownLevel {
        /// The axis.
        axis: ClassificationAxis,
        /// The unresolvable code.
        code: String,
    },
}

/// Which end of a proposed edge violated the compatibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// The source endpoint.
    Source,
    /// The target endpoint.
    Target,
}

impl std::fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeEnd::Source => write!(f, "source"),
            EdgeEnd::Target => write!(f, "target"),
        }
    }
}

/// Rejections of a proposed relationship write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationshipWriteError {
    /// Source and target are the same entity.
    #[error("entity {0} cannot relate to itself")]
    SelfLoop(Uuid),
    /// An endpoint id does not resolve.
    #[error("unknown entity {0}")]
    UnknownEntity(Uuid),
    /// An endpoint's kind is not allowed for the relationship type.
    #[error("{end} of a {relationship_type} edge cannot be a {kind} entity")]
    IncompatibleTypes {
        /// Type of the proposed edge.
        relationship_type: RelationshipType,
        /// Which endpoint broke the rule.
        end: EdgeEnd,
        /// Code of the offending entity kind.
        kind: String,
    },
    /// The exact (source, target, type) triple already exists.
    #[error("edge {source_id} -[{relationship_type}]-> {target_id} already exists")]
    DuplicateEdge {
        /// Source endpoint.
        source_id: Uuid,
        /// Target endpoint.
        target_id: Uuid,
        /// Edge type.
        relationship_type: RelationshipType,
    },
}

/// Rejections of a proposed entity delete.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeleteError {
    /// The id does not resolve.
    #[error("unknown entity {0}")]
    UnknownEntity(Uuid),
    /// Relationships still reference the entity and no cascade was
    /// requested. Carries the full blocking list.
    #[error("entity has {} dependent relationship(s)", .0.len())]
    HasDependents(Vec<Relationship>),
}

/// An approved delete: the entity and every relationship the delete will
/// remove, returned so the caller can confirm before committing.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlan {
    /// Entity to be removed.
    pub entity_id: Uuid,
    /// Relationships the delete will remove alongside the entity.
    pub cascade: Vec<Relationship>,
}

/// Checks a proposed entity create or update.
///
/// Every attribute is checked against its declared type and every axis
/// assignment against the level tables; all violations are collected.
/// Deterministic for unchanged input: the error list is sorted.
pub fn validate_entity_write(entity: &Entity) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if entity.name.trim().is_empty() {
        errors.push(ValidationError::BlankName);
    }

    for (name, attribute) in &entity.attributes {
        if attribute.check().is_err() {
            errors.push(ValidationError::TypeMismatch {
                attribute: name.clone(),
                expected: attribute.ty,
                found: json_shape(&attribute.value).to_string(),
            });
        }
    }

    for (axis, code) in &entity.assignments {
        if level_by_code(*axis, code).is_none() {
            errors.push(ValidationError::UnknownLevel {
                axis: *axis,
                code: code.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort_by_key(|e| e.to_string());
        Err(errors)
    }
}

/// Checks a proposed relationship write against graph and schema invariants.
pub fn validate_relationship_write(
    graph: &CatalogGraph,
    source_id: Uuid,
    target_id: Uuid,
    ty: RelationshipType,
) -> Result<(), RelationshipWriteError> {
    if source_id == target_id {
        return Err(RelationshipWriteError::SelfLoop(source_id));
    }
    let source = graph
        .entity(source_id)
        .ok_or(RelationshipWriteError::UnknownEntity(source_id))?;
    let target = graph
        .entity(target_id)
        .ok_or(RelationshipWriteError::UnknownEntity(target_id))?;

    // Rule presence is guaranteed by the startup self-check; a miss here is
    // treated as incompatible rather than panicking mid-request.
    let rule = endpoint_rule(ty);
    let source_ok = rule.map(|r| r.source.permits(&source.kind)).unwrap_or(false);
    let target_ok = rule.map(|r| r.target.permits(&target.kind)).unwrap_or(false);
    if !source_ok {
        return Err(RelationshipWriteError::IncompatibleTypes {
            relationship_type: ty,
            end: EdgeEnd::Source,
            kind: source.kind.code().to_string(),
        });
    }
    if !target_ok {
        return Err(RelationshipWriteError::IncompatibleTypes {
            relationship_type: ty,
            end: EdgeEnd::Target,
            kind: target.kind.code().to_string(),
        });
    }

    if graph.edge_exists(source_id, target_id, ty) {
        return Err(RelationshipWriteError::DuplicateEdge {
            source_id,
            target_id,
            relationship_type: ty,
        });
    }
    Ok(())
}

/// Checks a proposed entity delete.
///
/// Without `cascade`, any remaining relationship blocks the delete and the
/// full blocking list is returned. With `cascade`, the same list comes back
/// in the [`DeletePlan`] so the caller can confirm what will be removed.
pub fn validate_entity_delete(
    graph: &CatalogGraph,
    entity_id: Uuid,
    cascade: bool,
) -> Result<DeletePlan, DeleteError> {
    if graph.entity(entity_id).is_none() {
        return Err(DeleteError::UnknownEntity(entity_id));
    }
    let dependents: Vec<Relationship> = graph.relationships_from(entity_id).cloned().collect();
    if !dependents.is_empty() && !cascade {
        return Err(DeleteError::HasDependents(dependents));
    }
    Ok(DeletePlan {
        entity_id,
        cascade: dependents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attribute::ScalarKind;
    use crate::models::entity::EntityKind;
    use serde_json::json;

    fn seeded_graph() -> (CatalogGraph, Uuid, Uuid, Uuid) {
        let mut graph = CatalogGraph::new();
        let service = Entity::new("orders", EntityKind::Service);
        let api = Entity::new("orders-api", EntityKind::Api);
        let team = Entity::new("commerce", EntityKind::Team);
        let (s, a, t) = (service.id, api.id, team.id);
        graph.insert_entity(service).unwrap();
        graph.insert_entity(api).unwrap();
        graph.insert_entity(team).unwrap();
        (graph, s, a, t)
    }

    #[test]
    fn test_entity_write_ok() {
        let entity = Entity::new("orders", EntityKind::Service)
            .with_attribute(
                "replicas",
                AttributeType::scalar(ScalarKind::Integer),
                json!(3),
            )
            .with_assignment(ClassificationAxis::BusinessCriticality, "mission_critical");
        assert!(validate_entity_write(&entity).is_ok());
    }

    #[test]
    fn test_entity_write_collects_all_violations() {
        let entity = Entity::new("  ", EntityKind::Service)
            .with_attribute(
                "replicas",
                AttributeType::scalar(ScalarKind::Integer),
                json!("three"),
            )
            .with_attribute(
                "endpoints",
                AttributeType::array_of(ScalarKind::String),
                json!(["ok", 5]),
            )
            .with_assignment(ClassificationAxis::BusinessCriticality, "made_up");

        let errors = validate_entity_write(&entity).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::BlankName));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UnknownLevel { code, .. } if code == "made_up"
        )));
    }

    #[test]
    fn test_entity_write_idempotent() {
        let entity = Entity::new("orders", EntityKind::Service)
            .with_attribute(
                "replicas",
                AttributeType::scalar(ScalarKind::Integer),
                json!("three"),
            )
            .with_assignment(ClassificationAxis::StrategicValue, "nope");
        let first = validate_entity_write(&entity).unwrap_err();
        let second = validate_entity_write(&entity).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_relationship_write_self_loop() {
        let (graph, s, _, _) = seeded_graph();
        assert_eq!(
            validate_relationship_write(&graph, s, s, RelationshipType::DependsOn),
            Err(RelationshipWriteError::SelfLoop(s))
        );
    }

    #[test]
    fn test_relationship_write_unknown_entity() {
        let (graph, s, _, _) = seeded_graph();
        let ghost = Uuid::new_v4();
        assert_eq!(
            validate_relationship_write(&graph, s, ghost, RelationshipType::DependsOn),
            Err(RelationshipWriteError::UnknownEntity(ghost))
        );
    }

    #[test]
    fn test_member_of_must_target_team() {
        let (graph, s, api, team) = seeded_graph();
        // Toward an API: rejected on the target end.
        let err =
            validate_relationship_write(&graph, s, api, RelationshipType::MemberOf).unwrap_err();
        assert_eq!(
            err,
            RelationshipWriteError::IncompatibleTypes {
                relationship_type: RelationshipType::MemberOf,
                end: EdgeEnd::Target,
                kind: "api".to_string(),
            }
        );
        // Toward a team: accepted.
        assert!(
            validate_relationship_write(&graph, s, team, RelationshipType::MemberOf).is_ok()
        );
    }

    #[test]
    fn test_incompatible_source_kind() {
        let (graph, s, api, team) = seeded_graph();
        // Only a team may be the source of OwnerOf.
        let err =
            validate_relationship_write(&graph, s, api, RelationshipType::OwnerOf).unwrap_err();
        assert!(matches!(
            err,
            RelationshipWriteError::IncompatibleTypes {
                end: EdgeEnd::Source,
                ..
            }
        ));
        assert!(validate_relationship_write(&graph, team, api, RelationshipType::OwnerOf).is_ok());
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let (mut graph, s, api, _) = seeded_graph();
        graph.link(s, api, RelationshipType::ConsumesApi).unwrap();
        let err = validate_relationship_write(&graph, s, api, RelationshipType::ConsumesApi)
            .unwrap_err();
        assert!(matches!(err, RelationshipWriteError::DuplicateEdge { .. }));
    }

    #[test]
    fn test_delete_guard() {
        let (mut graph, s, api, _) = seeded_graph();
        let rel_id = graph.link(s, api, RelationshipType::ConsumesApi).unwrap();

        let err = validate_entity_delete(&graph, s, false).unwrap_err();
        match err {
            DeleteError::HasDependents(rels) => {
                assert_eq!(rels.len(), 1);
                assert_eq!(rels[0].id, rel_id);
            }
            other => panic!("expected HasDependents, got {other:?}"),
        }

        graph.unlink(rel_id).unwrap();
        let plan = validate_entity_delete(&graph, s, false).unwrap();
        assert!(plan.cascade.is_empty());
    }

    #[test]
    fn test_delete_with_cascade_lists_removals() {
        let (mut graph, s, api, team) = seeded_graph();
        graph.link(s, api, RelationshipType::ConsumesApi).unwrap();
        graph.link(s, team, RelationshipType::OwnedBy).unwrap();

        let plan = validate_entity_delete(&graph, s, true).unwrap();
        assert_eq!(plan.entity_id, s);
        assert_eq!(plan.cascade.len(), 2);
    }

    #[test]
    fn test_delete_unknown_entity() {
        let graph = CatalogGraph::new();
        let ghost = Uuid::new_v4();
        assert_eq!(
            validate_entity_delete(&graph, ghost, false),
            Err(DeleteError::UnknownEntity(ghost))
        );
    }
}
