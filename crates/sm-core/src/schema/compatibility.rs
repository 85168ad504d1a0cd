//! Endpoint-kind compatibility rules for relationship types.
//!
//! Which entity kinds may sit at each end of an edge is schema data, looked
//! up per relationship type, rather than conditionals scattered through the
//! write path. [`verify_compatibility`] checks at startup that every type has
//! a rule and that each rule mirrors its opposite's rule, so the materialized
//! twin of a valid edge is always valid too.

use super::opposites::try_opposite;
use super::SchemaError;
use crate::models::entity::EntityKind;
use crate::models::relationship::RelationshipType;

/// Constraint on the entity kinds allowed at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindConstraint {
    /// Any kind, including tenant-defined custom kinds.
    Any,
    /// Only kinds whose code appears in the list.
    OneOf(&'static [&'static str]),
}

impl KindConstraint {
    /// Returns true if the constraint permits the given kind.
    pub fn permits(&self, kind: &EntityKind) -> bool {
        match self {
            KindConstraint::Any => true,
            KindConstraint::OneOf(codes) => codes.iter().any(|c| *c == kind.code()),
        }
    }
}

/// Allowed source and target kinds for one relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointRule {
    /// The relationship type this rule governs.
    pub relationship_type: RelationshipType,
    /// Kinds allowed as the edge source.
    pub source: KindConstraint,
    /// Kinds allowed as the edge target.
    pub target: KindConstraint,
}

const ANY: KindConstraint = KindConstraint::Any;
const API: KindConstraint = KindConstraint::OneOf(&["api"]);
const TEAM: KindConstraint = KindConstraint::OneOf(&["team"]);
const SERVICE: KindConstraint = KindConstraint::OneOf(&["service"]);
const CALLERS: KindConstraint = KindConstraint::OneOf(&["service", "api", "platform"]);
const WORKLOADS: KindConstraint = KindConstraint::OneOf(&["api", "service"]);
const INFRA: KindConstraint = KindConstraint::OneOf(&["cluster", "node", "platform"]);
const COMPONENTS: KindConstraint =
    KindConstraint::OneOf(&["api", "service", "cluster", "node"]);
const PLATFORM: KindConstraint = KindConstraint::OneOf(&["platform"]);

/// The compatibility table. One rule per relationship type; a rule and its
/// opposite's rule are mirror images of each other.
pub static ENDPOINT_RULES: &[EndpointRule] = &[
    EndpointRule {
        relationship_type: RelationshipType::ConsumesApi,
        source: CALLERS,
        target: API,
    },
    EndpointRule {
        relationship_type: RelationshipType::ApiConsumedBy,
        source: API,
        target: CALLERS,
    },
    EndpointRule {
        relationship_type: RelationshipType::DependsOn,
        source: ANY,
        target: ANY,
    },
    EndpointRule {
        relationship_type: RelationshipType::DependencyOf,
        source: ANY,
        target: ANY,
    },
    EndpointRule {
        relationship_type: RelationshipType::ChildOf,
        source: ANY,
        target: ANY,
    },
    EndpointRule {
        relationship_type: RelationshipType::ParentOf,
        source: ANY,
        target: ANY,
    },
    EndpointRule {
        relationship_type: RelationshipType::MemberOf,
        source: ANY,
        target: TEAM,
    },
    EndpointRule {
        relationship_type: RelationshipType::HasMember,
        source: TEAM,
        target: ANY,
    },
    EndpointRule {
        relationship_type: RelationshipType::OwnedBy,
        source: ANY,
        target: TEAM,
    },
    EndpointRule {
        relationship_type: RelationshipType::OwnerOf,
        source: TEAM,
        target: ANY,
    },
    EndpointRule {
        relationship_type: RelationshipType::DeployedOn,
        source: WORKLOADS,
        target: INFRA,
    },
    EndpointRule {
        relationship_type: RelationshipType::Hosts,
        source: INFRA,
        target: WORKLOADS,
    },
    EndpointRule {
        relationship_type: RelationshipType::PartOf,
        source: COMPONENTS,
        target: PLATFORM,
    },
    EndpointRule {
        relationship_type: RelationshipType::HasPart,
        source: PLATFORM,
        target: COMPONENTS,
    },
    EndpointRule {
        relationship_type: RelationshipType::Implements,
        source: SERVICE,
        target: API,
    },
    EndpointRule {
        relationship_type: RelationshipType::ImplementedBy,
        source: API,
        target: SERVICE,
    },
];

/// Looks up the endpoint rule for a relationship type.
pub fn endpoint_rule(ty: RelationshipType) -> Option<&'static EndpointRule> {
    ENDPOINT_RULES.iter().find(|r| r.relationship_type == ty)
}

/// Verifies the compatibility table: every relationship type has exactly one
/// rule, and each rule is the mirror image of its opposite's rule.
pub fn verify_compatibility() -> Result<(), SchemaError> {
    for ty in RelationshipType::ALL {
        let matching = ENDPOINT_RULES
            .iter()
            .filter(|r| r.relationship_type == ty)
            .count();
        if matching == 0 {
            return Err(SchemaError::MissingEndpointRule(ty));
        }
        if matching > 1 {
            return Err(SchemaError::DuplicateEndpointRule(ty));
        }
        let rule = endpoint_rule(ty).ok_or(SchemaError::MissingEndpointRule(ty))?;
        let op = try_opposite(ty).ok_or(SchemaError::MissingOpposite(ty))?;
        let mirror = endpoint_rule(op).ok_or(SchemaError::MissingEndpointRule(op))?;
        if rule.source != mirror.target || rule.target != mirror.source {
            return Err(SchemaError::AsymmetricEndpointRule { a: ty, b: op });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_compatibility_passes() {
        verify_compatibility().unwrap();
    }

    #[test]
    fn test_rule_totality() {
        for ty in RelationshipType::ALL {
            assert!(endpoint_rule(ty).is_some(), "{ty} has no endpoint rule");
        }
    }

    #[test]
    fn test_member_of_targets_team_only() {
        let rule = endpoint_rule(RelationshipType::MemberOf).unwrap();
        assert!(rule.target.permits(&EntityKind::Team));
        assert!(!rule.target.permits(&EntityKind::Api));
        assert!(!rule.target.permits(&EntityKind::Service));
    }

    #[test]
    fn test_deployed_on_endpoints() {
        let rule = endpoint_rule(RelationshipType::DeployedOn).unwrap();
        assert!(rule.source.permits(&EntityKind::Service));
        assert!(!rule.source.permits(&EntityKind::Team));
        assert!(rule.target.permits(&EntityKind::Cluster));
        assert!(!rule.target.permits(&EntityKind::Api));
    }

    #[test]
    fn test_any_permits_custom_kinds() {
        let rule = endpoint_rule(RelationshipType::DependsOn).unwrap();
        assert!(rule
            .source
            .permits(&EntityKind::Custom("lambda".to_string())));
    }

    #[test]
    fn test_one_of_matches_custom_by_code() {
        // A custom kind whose code collides with a built-in code is treated
        // as that code by the constraint.
        let rule = endpoint_rule(RelationshipType::MemberOf).unwrap();
        assert!(rule.target.permits(&EntityKind::Custom("team".to_string())));
    }
}
