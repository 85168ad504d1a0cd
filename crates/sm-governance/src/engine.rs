//! The governance scoring engine.
//!
//! Combines an entity's classification assignments into a
//! [`GovernanceProfile`]: risk tier from the rule table, budget posture from
//! the strategic-value level, and the list of axes still awaiting curation.

use crate::profile::{GovernanceProfile, RecommendedAction, RiskTier};
use crate::rules::{default_rules, RiskRule};
use sm_core::schema::axes::{level_by_code, ClassificationAxis, Level};
use sm_core::Entity;
use thiserror::Error;
use tracing::debug;

/// Errors constructing a governance engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    /// Two rules share a name.
    #[error("duplicate rule name '{0}'")]
    DuplicateRuleName(String),
    /// The rule set is empty.
    #[error("rule set must not be empty")]
    EmptyRuleSet,
}

/// Evaluates the risk rule table over catalog entities.
///
/// The engine holds only the immutable rule table; [`derive`] reads nothing
/// but the entity passed in, so calls are deterministic and safe to run
/// concurrently from any number of request handlers.
///
/// [`derive`]: GovernanceEngine::derive
#[derive(Debug, Clone)]
pub struct GovernanceEngine {
    rules: Vec<RiskRule>,
}

impl GovernanceEngine {
    /// Creates an engine from a rule table.
    ///
    /// Rules are sorted by priority; names must be unique so a profile's
    /// `matched_rule` is unambiguous.
    pub fn new(mut rules: Vec<RiskRule>) -> Result<Self, GovernanceError> {
        if rules.is_empty() {
            return Err(GovernanceError::EmptyRuleSet);
        }
        let mut names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        for pair in names.windows(2) {
            if pair[0] == pair[1] {
                return Err(GovernanceError::DuplicateRuleName(pair[0].to_string()));
            }
        }
        rules.sort_by_key(|r| r.priority);
        Ok(Self { rules })
    }

    /// Creates an engine with the built-in rule table.
    pub fn with_default_rules() -> Self {
        // The default table is known-good; its own tests enforce unique
        // names and priorities.
        let mut rules = default_rules();
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    /// The rule table, in evaluation order.
    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    /// Reads the entity's assigned level for an axis from the schema tables.
    ///
    /// Returns `None` when the axis is unassigned or the code does not
    /// resolve (a stale code is surfaced by the validator, not here).
    pub fn axis_value(&self, entity: &Entity, axis: ClassificationAxis) -> Option<&'static Level> {
        entity
            .level_code(axis)
            .and_then(|code| level_by_code(axis, code))
    }

    /// Derives the governance profile for an entity.
    ///
    /// Pure with respect to the entity's current assignments: no clock, no
    /// caller state, so repeated calls with unchanged input are idempotent
    /// and cache-safe.
    pub fn derive(&self, entity: &Entity) -> GovernanceProfile {
        let matched = self.rules.iter().find(|rule| rule.matches(entity));
        let risk_tier = matched.map(|r| r.tier).unwrap_or(RiskTier::Low);

        let budget_posture = self
            .axis_value(entity, ClassificationAxis::StrategicValue)
            .and_then(|level| level.budget_posture);

        let incomplete_axes: Vec<ClassificationAxis> = ClassificationAxis::ALL
            .into_iter()
            .filter(|axis| entity.level_code(*axis).is_none())
            .collect();

        debug!(
            entity_id = %entity.id,
            tier = %risk_tier,
            rule = matched.map(|r| r.name.as_str()).unwrap_or("<none>"),
            "derived governance profile"
        );

        GovernanceProfile {
            entity_id: entity.id,
            risk_tier,
            matched_rule: matched.map(|r| r.name.clone()),
            budget_posture,
            recommended_action: RecommendedAction::for_tier(risk_tier),
            incomplete_axes,
        }
    }
}

impl Default for GovernanceEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
