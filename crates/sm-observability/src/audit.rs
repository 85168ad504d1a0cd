//! Audit trail for catalog mutations.
//!
//! Every create, update, delete, link, and unlink is recorded with actor and
//! outcome so curators can answer "who changed this and when". Entries are
//! kept in a bounded in-memory ring; production deployments drain it into
//! the audit sink of record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Default capacity of the in-memory ring.
pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// Kinds of auditable catalog events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatalogEventType {
    /// Entity created.
    EntityCreated,
    /// Entity updated.
    EntityUpdated,
    /// Entity deleted.
    EntityDeleted,
    /// Relationship pair linked.
    RelationshipLinked,
    /// Relationship pair unlinked.
    RelationshipUnlinked,
    /// A write was rejected by the validator.
    WriteRejected,
    /// Startup schema self-check ran.
    SchemaSelfCheck,
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The operation succeeded.
    Success,
    /// The operation failed; carries the reason.
    Failure(String),
}

/// One entry in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id.
    pub id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub event_type: CatalogEventType,
    /// Who did it (user or system component).
    pub actor: String,
    /// Entity the event touched, if any.
    pub entity_id: Option<Uuid>,
    /// Relationship the event touched, if any.
    pub relationship_id: Option<Uuid>,
    /// Human-readable description.
    pub description: String,
    /// Outcome.
    pub outcome: AuditOutcome,
}

impl AuditEntry {
    /// Creates a successful entry.
    pub fn success(
        event_type: CatalogEventType,
        actor: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            actor: actor.into(),
            entity_id: None,
            relationship_id: None,
            description: description.into(),
            outcome: AuditOutcome::Success,
        }
    }

    /// Creates a failure entry.
    pub fn failure(
        event_type: CatalogEventType,
        actor: impl Into<String>,
        description: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            outcome: AuditOutcome::Failure(reason.into()),
            ..Self::success(event_type, actor, description)
        }
    }

    /// Attaches the entity the event touched.
    pub fn with_entity(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Attaches the relationship the event touched.
    pub fn with_relationship(mut self, relationship_id: Uuid) -> Self {
        self.relationship_id = Some(relationship_id);
        self
    }
}

/// Bounded in-memory audit trail.
pub struct AuditLog {
    entries: Arc<RwLock<VecDeque<AuditEntry>>>,
    capacity: usize,
}

impl AuditLog {
    /// Creates a log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Creates a log with a specific capacity; the oldest entries are
    /// dropped once it is full.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
        }
    }

    /// Records an entry, evicting the oldest if at capacity.
    pub async fn record(&self, entry: AuditEntry) {
        info!(
            event = ?entry.event_type,
            actor = %entry.actor,
            entity = ?entry.entity_id,
            "audit"
        );
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The most recent `n` entries, newest first.
    pub async fn recent(&self, n: usize) -> Vec<AuditEntry> {
        let entries = self.entries.read().await;
        entries.iter().rev().take(n).cloned().collect()
    }

    /// All entries touching the given entity, newest first.
    pub async fn for_entity(&self, entity_id: Uuid) -> Vec<AuditEntry> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .rev()
            .filter(|e| e.entity_id == Some(entity_id))
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_query() {
        let log = AuditLog::new();
        let entity_id = Uuid::new_v4();

        log.record(
            AuditEntry::success(
                CatalogEventType::EntityCreated,
                "curator@corp",
                "created orders service",
            )
            .with_entity(entity_id),
        )
        .await;
        log.record(AuditEntry::success(
            CatalogEventType::RelationshipLinked,
            "curator@corp",
            "linked orders to payments-api",
        ))
        .await;

        assert_eq!(log.len().await, 2);
        let recent = log.recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent[0].event_type,
            CatalogEventType::RelationshipLinked
        );

        let for_entity = log.for_entity(entity_id).await;
        assert_eq!(for_entity.len(), 1);
        assert_eq!(for_entity[0].event_type, CatalogEventType::EntityCreated);
    }

    #[tokio::test]
    async fn test_capacity_eviction() {
        let log = AuditLog::with_capacity(2);
        for i in 0..3 {
            log.record(AuditEntry::success(
                CatalogEventType::EntityUpdated,
                "system",
                format!("update {i}"),
            ))
            .await;
        }
        assert_eq!(log.len().await, 2);
        let recent = log.recent(2).await;
        assert_eq!(recent[0].description, "update 2");
        assert_eq!(recent[1].description, "update 1");
    }

    #[tokio::test]
    async fn test_failure_entry() {
        let log = AuditLog::new();
        log.record(AuditEntry::failure(
            CatalogEventType::WriteRejected,
            "curator@corp",
            "create ledger",
            "attribute 'replicas' expects Integer, found string",
        ))
        .await;
        let recent = log.recent(1).await;
        assert!(matches!(recent[0].outcome, AuditOutcome::Failure(_)));
    }
}
