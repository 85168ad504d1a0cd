//! The opposite-relationship table.
//!
//! Every relationship type has exactly one opposite, and the mapping is an
//! involution with no fixed points. The pairing is data, not a match arm, so
//! [`verify_opposites`] can audit it exhaustively at startup. A missing entry
//! is a configuration defect; the process must refuse to start rather than
//! allow asymmetric edges.

use super::SchemaError;
use crate::models::relationship::RelationshipType;

/// The opposite-direction pairs. Each row declares both directions.
pub static OPPOSITE_PAIRS: &[(RelationshipType, RelationshipType)] = &[
    (RelationshipType::ConsumesApi, RelationshipType::ApiConsumedBy),
    (RelationshipType::DependsOn, RelationshipType::DependencyOf),
    (RelationshipType::ChildOf, RelationshipType::ParentOf),
    (RelationshipType::MemberOf, RelationshipType::HasMember),
    (RelationshipType::OwnedBy, RelationshipType::OwnerOf),
    (RelationshipType::DeployedOn, RelationshipType::Hosts),
    (RelationshipType::PartOf, RelationshipType::HasPart),
    (RelationshipType::Implements, RelationshipType::ImplementedBy),
];

/// Looks up the opposite of a relationship type in the pair table.
///
/// Returns `None` only if the table is missing an entry, which
/// [`verify_opposites`] rules out at startup.
pub fn try_opposite(ty: RelationshipType) -> Option<RelationshipType> {
    OPPOSITE_PAIRS.iter().find_map(|&(a, b)| {
        if a == ty {
            Some(b)
        } else if b == ty {
            Some(a)
        } else {
            None
        }
    })
}

/// Returns the opposite of a relationship type.
///
/// # Panics
///
/// Panics if the pair table is missing an entry for `ty`. Run
/// [`crate::schema::self_check`] at process startup; it guarantees the table
/// is total before any edge is written.
pub fn opposite(ty: RelationshipType) -> RelationshipType {
    match try_opposite(ty) {
        Some(op) => op,
        None => panic!("relationship type {ty} has no opposite mapping"),
    }
}

/// Verifies the pair table: total over the enumeration, involutive, and free
/// of fixed points.
pub fn verify_opposites() -> Result<(), SchemaError> {
    for ty in RelationshipType::ALL {
        let op = try_opposite(ty).ok_or(SchemaError::MissingOpposite(ty))?;
        if op == ty {
            return Err(SchemaError::SelfOpposite(ty));
        }
        let back = try_opposite(op).ok_or(SchemaError::MissingOpposite(op))?;
        if back != ty {
            return Err(SchemaError::BrokenInvolution(ty));
        }
    }
    // No type may appear in two rows.
    let mut seen: Vec<RelationshipType> = Vec::new();
    for &(a, b) in OPPOSITE_PAIRS {
        for ty in [a, b] {
            if seen.contains(&ty) {
                return Err(SchemaError::BrokenInvolution(ty));
            }
            seen.push(ty);
        }
    }
    Ok(())
}
