//! # sm-governance
//!
//! Governance scoring for ServiceMap: an explicit risk rule table evaluated
//! over an entity's classification assignments, producing the profile shown
//! on detail pages (risk tier, budget posture, missing-axis prompts).

pub mod engine;
pub mod profile;
pub mod rules;

pub use engine::{GovernanceEngine, GovernanceError};
pub use profile::{GovernanceProfile, RecommendedAction, RiskTier};
pub use rules::{default_rules, RiskRule, RuleCondition};
