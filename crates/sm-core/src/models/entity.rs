//! Entity data model for the catalog.
//!
//! An entity is one catalog record: an API, a service, a cluster, a node, a
//! team, a platform. Entities carry typed attributes and at most one level
//! per classification axis.

use crate::models::attribute::{AttributeType, AttributeTypeError};
use crate::schema::axes::ClassificationAxis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The kind of a catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An API contract.
    Api,
    /// A running service.
    Service,
    /// A compute cluster.
    Cluster,
    /// A single machine or VM.
    Node,
    /// A group of people.
    Team,
    /// A platform grouping services and infrastructure.
    Platform,
    /// Tenant-defined kind.
    Custom(String),
}

impl EntityKind {
    /// Stable lowercase code for this kind.
    pub fn code(&self) -> &str {
        match self {
            EntityKind::Api => "api",
            EntityKind::Service => "service",
            EntityKind::Cluster => "cluster",
            EntityKind::Node => "node",
            EntityKind::Team => "team",
            EntityKind::Platform => "platform",
            EntityKind::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Api => write!(f, "API"),
            EntityKind::Service => write!(f, "Service"),
            EntityKind::Cluster => write!(f, "Cluster"),
            EntityKind::Node => write!(f, "Node"),
            EntityKind::Team => write!(f, "Team"),
            EntityKind::Platform => write!(f, "Platform"),
            EntityKind::Custom(name) => write!(f, "Custom: {}", name),
        }
    }
}

/// A typed attribute value: the declared type plus the runtime payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeValue {
    /// Declared type of this attribute.
    pub ty: AttributeType,
    /// Runtime value, checked against `ty` before a write is accepted.
    pub value: serde_json::Value,
}

impl AttributeValue {
    /// Creates a typed attribute value.
    pub fn new(ty: AttributeType, value: serde_json::Value) -> Self {
        Self { ty, value }
    }

    /// Checks the payload against the declared type.
    pub fn check(&self) -> Result<(), AttributeTypeError> {
        self.ty.validate(&self.value)
    }
}

/// A catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Unique identifier.
    pub id: Uuid,
    /// What kind of record this is.
    pub kind: EntityKind,
    /// Human-readable name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Typed attributes by name.
    pub attributes: HashMap<String, AttributeValue>,
    /// Classification level codes, at most one per axis.
    pub assignments: HashMap<ClassificationAxis, String>,
    /// Arbitrary labels for filtering.
    pub tags: HashMap<String, String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Creates a new entity with a fresh id.
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            description: None,
            attributes: HashMap::new(),
            assignments: HashMap::new(),
            tags: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a typed attribute, replacing any previous value under the name.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        ty: AttributeType,
        value: serde_json::Value,
    ) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::new(ty, value));
        self
    }

    /// Assigns a classification level, replacing any previous assignment on
    /// the axis. Codes are validated by the consistency validator, not here.
    pub fn with_assignment(mut self, axis: ClassificationAxis, code: impl Into<String>) -> Self {
        self.assignments.insert(axis, code.into());
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Returns the assigned level code for an axis, if any.
    pub fn level_code(&self, axis: ClassificationAxis) -> Option<&str> {
        self.assignments.get(&axis).map(String::as_str)
    }

    /// Sets a typed attribute in place.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        ty: AttributeType,
        value: serde_json::Value,
    ) {
        self.attributes
            .insert(name.into(), AttributeValue::new(ty, value));
        self.touch();
    }

    /// Assigns a classification level in place.
    pub fn assign(&mut self, axis: ClassificationAxis, code: impl Into<String>) {
        self.assignments.insert(axis, code.into());
        self.touch();
    }

    /// Clears the assignment on an axis.
    pub fn unassign(&mut self, axis: ClassificationAxis) -> Option<String> {
        let prev = self.assignments.remove(&axis);
        if prev.is_some() {
            self.touch();
        }
        prev
    }

    /// Updates the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
