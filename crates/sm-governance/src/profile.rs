//! Derived governance signals for a catalog entity.

use serde::{Deserialize, Serialize};
use sm_core::schema::axes::ClassificationAxis;
use sm_core::BudgetPosture;
use uuid::Uuid;

/// Risk exposure tier derived from an entity's classifications.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// No notable exposure.
    Low,
    /// Worth watching.
    Moderate,
    /// Needs active attention.
    Elevated,
    /// Top of the audit queue.
    Critical,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Moderate => write!(f, "Moderate"),
            RiskTier::Elevated => write!(f, "Elevated"),
            RiskTier::Critical => write!(f, "Critical"),
        }
    }
}

/// Follow-up the tier implies for curators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Routine monitoring only.
    Monitor,
    /// Schedule a governance review.
    Review,
    /// Remediate findings on a deadline.
    Remediate,
    /// Escalate to governance stakeholders now.
    Escalate,
}

impl RecommendedAction {
    /// Maps a risk tier to its follow-up.
    pub fn for_tier(tier: RiskTier) -> Self {
        match tier {
            RiskTier::Low => RecommendedAction::Monitor,
            RiskTier::Moderate => RecommendedAction::Review,
            RiskTier::Elevated => RecommendedAction::Remediate,
            RiskTier::Critical => RecommendedAction::Escalate,
        }
    }
}

/// The combined governance read-out for one entity.
///
/// A pure function of the entity's axis assignments: deriving it twice for
/// an unchanged entity yields an identical profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GovernanceProfile {
    /// Entity the profile describes.
    pub entity_id: Uuid,
    /// Derived risk exposure tier.
    pub risk_tier: RiskTier,
    /// Name of the rule that set the tier, if any rule matched.
    pub matched_rule: Option<String>,
    /// Budget posture read from the strategic-value level, if assigned.
    pub budget_posture: Option<BudgetPosture>,
    /// Follow-up implied by the tier.
    pub recommended_action: RecommendedAction,
    /// Axes with no assigned level, in display order, for curator prompts.
    pub incomplete_axes: Vec<ClassificationAxis>,
}

impl GovernanceProfile {
    /// True if every axis has an assignment.
    pub fn is_complete(&self) -> bool {
        self.incomplete_axes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Critical > RiskTier::Elevated);
        assert!(RiskTier::Elevated > RiskTier::Moderate);
        assert!(RiskTier::Moderate > RiskTier::Low);
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(
            RecommendedAction::for_tier(RiskTier::Critical),
            RecommendedAction::Escalate
        );
        assert_eq!(
            RecommendedAction::for_tier(RiskTier::Low),
            RecommendedAction::Monitor
        );
    }

    #[test]
    fn test_profile_serialization() {
        let profile = GovernanceProfile {
            entity_id: Uuid::new_v4(),
            risk_tier: RiskTier::Elevated,
            matched_rule: Some("restricted-data".to_string()),
            budget_posture: Some(BudgetPosture::Invest),
            recommended_action: RecommendedAction::Remediate,
            incomplete_axes: vec![ClassificationAxis::TechnicalFit],
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: GovernanceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
        assert!(!back.is_complete());
    }
}
