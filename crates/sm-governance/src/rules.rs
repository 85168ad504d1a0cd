//! Risk rule definitions.
//!
//! Cross-axis policy lives here as an explicit rule table: each rule names
//! its conditions over an entity's axis assignments and the tier it assigns.
//! Adding a rule means adding a table entry, not touching axis code.

use crate::profile::RiskTier;
use serde::{Deserialize, Serialize};
use sm_core::schema::axes::{level_by_code, ClassificationAxis};
use sm_core::Entity;

/// A condition over an entity's classification assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCondition {
    /// The entity's level on an axis is exactly the given code.
    LevelIs {
        /// Axis to read.
        axis: ClassificationAxis,
        /// Required level code.
        code: String,
    },
    /// The entity's level code on an axis is in the given list.
    LevelIn {
        /// Axis to read.
        axis: ClassificationAxis,
        /// Accepted level codes.
        codes: Vec<String>,
    },
    /// The data-classification sensitivity ordinal is at least the bound.
    SensitivityAtLeast(u8),
    /// The axis rank is at least the bound (ordered axes only).
    RankAtLeast {
        /// Axis to read.
        axis: ClassificationAxis,
        /// Inclusive lower bound.
        rank: u8,
    },
    /// The axis rank is at most the bound (ordered axes only).
    RankAtMost {
        /// Axis to read.
        axis: ClassificationAxis,
        /// Inclusive upper bound.
        rank: u8,
    },
    /// The axis has an assigned level.
    Assigned(ClassificationAxis),
    /// The axis has no assigned level.
    Unassigned(ClassificationAxis),
    /// All sub-conditions hold.
    All(Vec<RuleCondition>),
    /// At least one sub-condition holds.
    AnyOf(Vec<RuleCondition>),
    /// The sub-condition does not hold.
    Not(Box<RuleCondition>),
    /// Always holds.
    Always,
}

impl RuleCondition {
    /// Evaluates this condition against an entity's assignments.
    ///
    /// Unassigned axes and unresolvable codes make value conditions false;
    /// they never error.
    pub fn evaluate(&self, entity: &Entity) -> bool {
        match self {
            RuleCondition::LevelIs { axis, code } => {
                entity.level_code(*axis) == Some(code.as_str())
            }
            RuleCondition::LevelIn { axis, codes } => entity
                .level_code(*axis)
                .map(|c| codes.iter().any(|code| code == c))
                .unwrap_or(false),
            RuleCondition::SensitivityAtLeast(bound) => entity
                .level_code(ClassificationAxis::DataClassification)
                .and_then(|code| level_by_code(ClassificationAxis::DataClassification, code))
                .and_then(|level| level.sensitivity)
                .map(|s| s >= *bound)
                .unwrap_or(false),
            RuleCondition::RankAtLeast { axis, rank } => rank_of(entity, *axis)
                .map(|r| r >= *rank)
                .unwrap_or(false),
            RuleCondition::RankAtMost { axis, rank } => rank_of(entity, *axis)
                .map(|r| r <= *rank)
                .unwrap_or(false),
            RuleCondition::Assigned(axis) => entity.level_code(*axis).is_some(),
            RuleCondition::Unassigned(axis) => entity.level_code(*axis).is_none(),
            RuleCondition::All(conditions) => conditions.iter().all(|c| c.evaluate(entity)),
            RuleCondition::AnyOf(conditions) => conditions.iter().any(|c| c.evaluate(entity)),
            RuleCondition::Not(condition) => !condition.evaluate(entity),
            RuleCondition::Always => true,
        }
    }
}

fn rank_of(entity: &Entity, axis: ClassificationAxis) -> Option<u8> {
    entity
        .level_code(axis)
        .and_then(|code| level_by_code(axis, code))
        .and_then(|level| level.rank)
}

/// One entry of the risk rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRule {
    /// Unique name, referenced in derived profiles.
    pub name: String,
    /// What the rule is for.
    pub description: Option<String>,
    /// Conditions that must all hold for the rule to match.
    pub conditions: Vec<RuleCondition>,
    /// Tier assigned when the rule matches.
    pub tier: RiskTier,
    /// Evaluation order; lower wins first.
    pub priority: u32,
    /// Disabled rules never match.
    pub enabled: bool,
}

impl RiskRule {
    /// Creates an enabled rule with default priority.
    pub fn new(name: impl Into<String>, conditions: Vec<RuleCondition>, tier: RiskTier) -> Self {
        Self {
            name: name.into(),
            description: None,
            conditions,
            tier,
            priority: 100,
            enabled: true,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Checks whether this rule matches the entity.
    pub fn matches(&self, entity: &Entity) -> bool {
        self.enabled && self.conditions.iter().all(|c| c.evaluate(entity))
    }
}

/// The default risk rule table.
///
/// The confidential/mission-critical rule is mandated policy; the remaining
/// entries are house defaults and each can be removed independently.
pub fn default_rules() -> Vec<RiskRule> {
    vec![
        RiskRule::new(
            "confidential-mission-critical",
            vec![
                RuleCondition::SensitivityAtLeast(2),
                RuleCondition::LevelIs {
                    axis: ClassificationAxis::BusinessCriticality,
                    code: "mission_critical".to_string(),
                },
            ],
            RiskTier::Critical,
        )
        .with_description("Confidential or stricter data on a mission-critical entity")
        .with_priority(10),
        RiskRule::new(
            "restricted-data",
            vec![RuleCondition::SensitivityAtLeast(3)],
            RiskTier::Elevated,
        )
        .with_description("Regulated data raises exposure regardless of criticality")
        .with_priority(20),
        RiskRule::new(
            "fragile-critical-system",
            vec![
                RuleCondition::RankAtLeast {
                    axis: ClassificationAxis::BusinessCriticality,
                    rank: 3,
                },
                RuleCondition::RankAtMost {
                    axis: ClassificationAxis::TechnicalFit,
                    rank: 2,
                },
            ],
            RiskTier::Elevated,
        )
        .with_description("Critical entity on a poorly fitting technology base")
        .with_priority(30),
        RiskRule::new(
            "high-criticality-floor",
            vec![RuleCondition::RankAtLeast {
                axis: ClassificationAxis::BusinessCriticality,
                rank: 3,
            }],
            RiskTier::Moderate,
        )
        .with_description("Business-critical entities never sit below Moderate")
        .with_priority(40),
        RiskRule::new(
            "confidential-data",
            vec![RuleCondition::SensitivityAtLeast(2)],
            RiskTier::Moderate,
        )
        .with_description("Confidential data is worth watching on its own")
        .with_priority(50),
    ]
}
