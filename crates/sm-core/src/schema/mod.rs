//! Static catalog schema: classification axes, the opposite-relationship
//! table, and endpoint-kind compatibility rules.
//!
//! All tables are immutable process-wide data. [`self_check`] audits every
//! table exhaustively and must be run at startup; a failure is a
//! configuration defect, and callers must refuse to start rather than run
//! with a schema that can produce asymmetric or ill-typed edges.

pub mod axes;
pub mod compatibility;
pub mod opposites;

use crate::models::relationship::RelationshipType;
use axes::ClassificationAxis;
use thiserror::Error;

pub use axes::{level_by_code, levels, verify_axes, BudgetPosture, Level};
pub use compatibility::{endpoint_rule, verify_compatibility, EndpointRule, KindConstraint};
pub use opposites::{opposite, try_opposite, verify_opposites};

/// Defects in the static schema tables. Fatal at startup, never surfaced to
/// a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A relationship type has no entry in the opposite table.
    #[error("relationship type {0} has no opposite mapping")]
    MissingOpposite(RelationshipType),
    /// A relationship type maps to itself.
    #[error("relationship type {0} is mapped as its own opposite")]
    SelfOpposite(RelationshipType),
    /// Applying the opposite mapping twice does not return the original.
    #[error("opposite mapping is not an involution at {0}")]
    BrokenInvolution(RelationshipType),
    /// An axis has no levels defined.
    #[error("axis {0} has no levels")]
    EmptyAxis(ClassificationAxis),
    /// Two levels on the same axis share a code.
    #[error("axis {axis} has duplicate level code '{code}'")]
    DuplicateLevelCode {
        /// Axis containing the duplicate.
        axis: ClassificationAxis,
        /// The repeated code.
        code: &'static str,
    },
    /// Some but not all levels on an axis carry a rank.
    #[error("axis {0} mixes ranked and unranked levels")]
    PartiallyRankedAxis(ClassificationAxis),
    /// Ranks or sensitivities are not strictly increasing in table order.
    #[error("axis {axis} rank ordering breaks at level '{code}'")]
    NonMonotonicRank {
        /// Axis with the ordering defect.
        axis: ClassificationAxis,
        /// First level out of order.
        code: &'static str,
    },
    /// A relationship type has no endpoint rule.
    #[error("relationship type {0} has no endpoint rule")]
    MissingEndpointRule(RelationshipType),
    /// A relationship type has more than one endpoint rule.
    #[error("relationship type {0} has multiple endpoint rules")]
    DuplicateEndpointRule(RelationshipType),
    /// A rule and its opposite's rule are not mirror images.
    #[error("endpoint rules for {a} and {b} do not mirror each other")]
    AsymmetricEndpointRule {
        /// One direction of the pair.
        a: RelationshipType,
        /// The other direction.
        b: RelationshipType,
    },
}

/// Runs every schema table verification.
///
/// Call once at process startup and abort on `Err`; after a successful check
/// the tables may be read lock-free from any thread.
pub fn self_check() -> Result<(), SchemaError> {
    verify_opposites()?;
    verify_axes()?;
    verify_compatibility()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check_passes() {
        self_check().unwrap();
    }
}
