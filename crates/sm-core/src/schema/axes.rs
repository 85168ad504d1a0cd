//! Classification axes and their level tables.
//!
//! Each axis is a closed set of levels defined as static data. Entities
//! reference a level by axis + code; the tables themselves are immutable and
//! shared freely across threads. [`verify_axes`] is part of the startup
//! self-check and enforces code uniqueness and strict rank ordering for the
//! ordered axes.

use super::SchemaError;
use serde::{Deserialize, Serialize};

/// One governance rating dimension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationAxis {
    /// How essential the entity is to business operations.
    BusinessCriticality,
    /// Investment posture toward the entity.
    StrategicValue,
    /// How well the implementation fits its technical requirements.
    TechnicalFit,
    /// How well the entity covers its functional requirements.
    FunctionalFit,
    /// Sensitivity of the data the entity handles.
    DataClassification,
    /// Where and how the entity is deployed.
    DeploymentModel,
    /// How the entity communicates with its consumers.
    CommunicationStyle,
}

impl ClassificationAxis {
    /// Every axis, in display order.
    pub const ALL: [ClassificationAxis; 7] = [
        ClassificationAxis::BusinessCriticality,
        ClassificationAxis::StrategicValue,
        ClassificationAxis::TechnicalFit,
        ClassificationAxis::FunctionalFit,
        ClassificationAxis::DataClassification,
        ClassificationAxis::DeploymentModel,
        ClassificationAxis::CommunicationStyle,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationAxis::BusinessCriticality => "Business Criticality",
            ClassificationAxis::StrategicValue => "Strategic Value",
            ClassificationAxis::TechnicalFit => "Technical Fit",
            ClassificationAxis::FunctionalFit => "Functional Fit",
            ClassificationAxis::DataClassification => "Data Classification",
            ClassificationAxis::DeploymentModel => "Deployment Model",
            ClassificationAxis::CommunicationStyle => "Communication Style",
        }
    }
}

impl std::fmt::Display for ClassificationAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Budget posture implied by a strategic-value level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPosture {
    /// Wind the entity down; no new spend.
    Divest,
    /// Keep the lights on at minimal cost.
    Sustain,
    /// Fund upkeep and incremental improvement.
    Maintain,
    /// Actively fund growth.
    Invest,
}

impl std::fmt::Display for BudgetPosture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetPosture::Divest => write!(f, "Divest"),
            BudgetPosture::Sustain => write!(f, "Sustain"),
            BudgetPosture::Maintain => write!(f, "Maintain"),
            BudgetPosture::Invest => write!(f, "Invest"),
        }
    }
}

/// One enumerated value within a classification axis.
///
/// Axis-specific facts are optional fields: ordered axes carry a `rank`,
/// strategic-value levels a `budget_posture`, data-classification levels a
/// `sensitivity` ordinal, and communication styles a set of permitted
/// authentication schemes.
///
/// Levels are static data; they serialize for API responses but are never
/// read back in.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Level {
    /// Axis this level belongs to.
    pub axis: ClassificationAxis,
    /// Stable code, unique within the axis.
    pub code: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Short description shown to curators.
    pub description: &'static str,
    /// Position on the axis, strictly increasing with severity/importance.
    pub rank: Option<u8>,
    /// Budget posture, on strategic-value levels only.
    pub budget_posture: Option<BudgetPosture>,
    /// Sensitivity ordinal, on data-classification levels only.
    pub sensitivity: Option<u8>,
    /// Permitted authentication schemes, on communication styles only.
    pub auth_schemes: &'static [&'static str],
}

const fn level(
    axis: ClassificationAxis,
    code: &'static str,
    label: &'static str,
    description: &'static str,
) -> Level {
    Level {
        axis,
        code,
        label,
        description,
        rank: None,
        budget_posture: None,
        sensitivity: None,
        auth_schemes: &[],
    }
}

const fn ranked(
    axis: ClassificationAxis,
    code: &'static str,
    label: &'static str,
    description: &'static str,
    rank: u8,
) -> Level {
    Level {
        rank: Some(rank),
        ..level(axis, code, label, description)
    }
}

/// Every level of every axis, grouped by axis in rank order.
pub static LEVELS: &[Level] = &[
    // Business criticality
    ranked(
        ClassificationAxis::BusinessCriticality,
        "administrative_service",
        "Administrative Service",
        "Routine administration; outages are an inconvenience",
        1,
    ),
    ranked(
        ClassificationAxis::BusinessCriticality,
        "business_operational",
        "Business Operational",
        "Supports day-to-day operations; outages degrade service",
        2,
    ),
    ranked(
        ClassificationAxis::BusinessCriticality,
        "business_critical",
        "Business Critical",
        "Core business depends on it; outages cause measurable loss",
        3,
    ),
    ranked(
        ClassificationAxis::BusinessCriticality,
        "mission_critical",
        "Mission Critical",
        "The business stops without it",
        4,
    ),
    // Strategic value
    Level {
        budget_posture: Some(BudgetPosture::Divest),
        ..ranked(
            ClassificationAxis::StrategicValue,
            "marginal",
            "Marginal",
            "No longer earns its keep; plan retirement",
            1,
        )
    },
    Level {
        budget_posture: Some(BudgetPosture::Sustain),
        ..ranked(
            ClassificationAxis::StrategicValue,
            "commodity",
            "Commodity",
            "Undifferentiated capability; run at lowest cost",
            2,
        )
    },
    Level {
        budget_posture: Some(BudgetPosture::Maintain),
        ..ranked(
            ClassificationAxis::StrategicValue,
            "supporting",
            "Supporting",
            "Enables differentiating work without being differentiating itself",
            3,
        )
    },
    Level {
        budget_posture: Some(BudgetPosture::Invest),
        ..ranked(
            ClassificationAxis::StrategicValue,
            "differentiating",
            "Differentiating",
            "Competitive advantage; fund growth",
            4,
        )
    },
    // Technical fit
    ranked(
        ClassificationAxis::TechnicalFit,
        "inappropriate",
        "Inappropriate",
        "Technology choice actively works against requirements",
        1,
    ),
    ranked(
        ClassificationAxis::TechnicalFit,
        "unreasonable",
        "Unreasonable",
        "Significant technical debt or platform mismatch",
        2,
    ),
    ranked(
        ClassificationAxis::TechnicalFit,
        "adequate",
        "Adequate",
        "Fit for purpose with known compromises",
        3,
    ),
    ranked(
        ClassificationAxis::TechnicalFit,
        "fully_appropriate",
        "Fully Appropriate",
        "Technology matches requirements with headroom",
        4,
    ),
    // Functional fit
    ranked(
        ClassificationAxis::FunctionalFit,
        "insufficient",
        "Insufficient",
        "Misses required functionality",
        1,
    ),
    ranked(
        ClassificationAxis::FunctionalFit,
        "partial",
        "Partial",
        "Covers some requirements; workarounds needed",
        2,
    ),
    ranked(
        ClassificationAxis::FunctionalFit,
        "appropriate",
        "Appropriate",
        "Covers the requirements",
        3,
    ),
    ranked(
        ClassificationAxis::FunctionalFit,
        "excellent",
        "Excellent",
        "Exceeds requirements",
        4,
    ),
    // Data classification
    Level {
        sensitivity: Some(0),
        ..level(
            ClassificationAxis::DataClassification,
            "public",
            "Public",
            "Freely shareable",
        )
    },
    Level {
        sensitivity: Some(1),
        ..level(
            ClassificationAxis::DataClassification,
            "internal",
            "Internal",
            "For employees and contractors only",
        )
    },
    Level {
        sensitivity: Some(2),
        ..level(
            ClassificationAxis::DataClassification,
            "confidential",
            "Confidential",
            "Disclosure causes business harm",
        )
    },
    Level {
        sensitivity: Some(3),
        ..level(
            ClassificationAxis::DataClassification,
            "restricted",
            "Restricted",
            "Regulated or contractually protected data",
        )
    },
    // Deployment model
    level(
        ClassificationAxis::DeploymentModel,
        "on_premise",
        "On Premise",
        "Runs in company-operated data centers",
    ),
    level(
        ClassificationAxis::DeploymentModel,
        "private_cloud",
        "Private Cloud",
        "Dedicated cloud infrastructure",
    ),
    level(
        ClassificationAxis::DeploymentModel,
        "public_cloud",
        "Public Cloud",
        "Shared cloud infrastructure",
    ),
    level(
        ClassificationAxis::DeploymentModel,
        "hybrid",
        "Hybrid",
        "Split across on-premise and cloud",
    ),
    level(
        ClassificationAxis::DeploymentModel,
        "saas",
        "SaaS",
        "Vendor-operated software",
    ),
    // Communication style
    Level {
        auth_schemes: &["oauth2", "api_key"],
        ..level(
            ClassificationAxis::CommunicationStyle,
            "rest",
            "REST",
            "Resource-oriented HTTP API",
        )
    },
    Level {
        auth_schemes: &["ws_security", "basic"],
        ..level(
            ClassificationAxis::CommunicationStyle,
            "soap",
            "SOAP",
            "XML envelope over HTTP",
        )
    },
    Level {
        auth_schemes: &["mtls", "oauth2"],
        ..level(
            ClassificationAxis::CommunicationStyle,
            "grpc",
            "gRPC",
            "Binary RPC over HTTP/2",
        )
    },
    Level {
        auth_schemes: &["oauth2", "api_key"],
        ..level(
            ClassificationAxis::CommunicationStyle,
            "graphql",
            "GraphQL",
            "Query-language HTTP API",
        )
    },
    Level {
        auth_schemes: &["mtls", "sasl"],
        ..level(
            ClassificationAxis::CommunicationStyle,
            "messaging",
            "Messaging",
            "Asynchronous broker-mediated exchange",
        )
    },
];

/// Returns all levels of one axis, in table order.
pub fn levels(axis: ClassificationAxis) -> impl Iterator<Item = &'static Level> {
    LEVELS.iter().filter(move |l| l.axis == axis)
}

/// Looks up a level by axis and code.
pub fn level_by_code(axis: ClassificationAxis, code: &str) -> Option<&'static Level> {
    LEVELS.iter().find(|l| l.axis == axis && l.code == code)
}

/// Verifies the level tables: codes unique within each axis, ranks and
/// sensitivities unique and strictly increasing where present.
pub fn verify_axes() -> Result<(), SchemaError> {
    for axis in ClassificationAxis::ALL {
        let axis_levels: Vec<&Level> = levels(axis).collect();
        if axis_levels.is_empty() {
            return Err(SchemaError::EmptyAxis(axis));
        }
        for (i, a) in axis_levels.iter().enumerate() {
            for b in &axis_levels[i + 1..] {
                if a.code == b.code {
                    return Err(SchemaError::DuplicateLevelCode {
                        axis,
                        code: a.code,
                    });
                }
            }
        }
        let ranked_count = axis_levels.iter().filter(|l| l.rank.is_some()).count();
        if ranked_count != 0 && ranked_count != axis_levels.len() {
            return Err(SchemaError::PartiallyRankedAxis(axis));
        }
        for pair in axis_levels.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].rank, pair[1].rank) {
                if b <= a {
                    return Err(SchemaError::NonMonotonicRank {
                        axis,
                        code: pair[1].code,
                    });
                }
            }
            if let (Some(a), Some(b)) = (pair[0].sensitivity, pair[1].sensitivity) {
                if b <= a {
                    return Err(SchemaError::NonMonotonicRank {
                        axis,
                        code: pair[1].code,
                    });
                }
            }
        }
    }
    Ok(())
}
