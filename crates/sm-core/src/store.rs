//! Storage traits and the in-memory catalog store.
//!
//! The REST layer talks to the catalog through these traits; the production
//! implementation delegates to the database, and [`InMemoryCatalogStore`]
//! backs tests and single-process deployments. The in-memory store runs the
//! consistency validator before every write and holds one lock across both
//! halves of a relationship pair, so readers never observe half a link.

use crate::graph::{CatalogGraph, GraphError};
use crate::models::entity::{Entity, EntityKind};
use crate::models::relationship::{Relationship, RelationshipType};
use crate::schema::axes::ClassificationAxis;
use crate::validation::{
    validate_entity_delete, validate_entity_write, validate_relationship_write, DeleteError,
    RelationshipWriteError, ValidationError,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors from catalog store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given id.
    #[error("not found: {0}")]
    NotFound(Uuid),
    /// A record with the given id already exists.
    #[error("duplicate: {0}")]
    Duplicate(Uuid),
    /// An entity write failed validation; all violations are listed.
    #[error("entity write rejected with {} violation(s)", .0.len())]
    Rejected(Vec<ValidationError>),
    /// A relationship write violated a graph or schema invariant.
    #[error(transparent)]
    EdgeRejected(#[from] RelationshipWriteError),
    /// A delete was blocked by dependent relationships.
    #[error(transparent)]
    DeleteBlocked(#[from] DeleteError),
    /// Backend failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GraphError> for StoreError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownEntity(id) | GraphError::NotFound(id) => StoreError::NotFound(id),
            GraphError::DuplicateEntity(id) => StoreError::Duplicate(id),
            GraphError::DuplicateEdge {
                source_id,
                target_id,
                relationship_type,
            } => StoreError::EdgeRejected(RelationshipWriteError::DuplicateEdge {
                source_id,
                target_id,
                relationship_type,
            }),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Search parameters for querying entities.
#[derive(Debug, Default, Clone)]
pub struct EntitySearchParams {
    /// Filter by name (case-insensitive substring).
    pub name: Option<String>,
    /// Filter by entity kind.
    pub kind: Option<EntityKind>,
    /// Filter by an axis assignment (axis, level code).
    pub axis_level: Option<(ClassificationAxis, String)>,
    /// Filter by tag key-value pair.
    pub tag: Option<(String, String)>,
    /// Maximum results to return.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

/// Storage for catalog entities.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Finds an entity by id.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Entity>>;

    /// Searches entities matching the given parameters.
    async fn search(&self, params: &EntitySearchParams) -> StoreResult<Vec<Entity>>;

    /// Creates a new entity after validating it.
    async fn create(&self, entity: &Entity) -> StoreResult<()>;

    /// Updates an existing entity after validating it.
    async fn update(&self, entity: &Entity) -> StoreResult<()>;

    /// Deletes an entity. Without `cascade` the delete is refused while
    /// relationships reference it. Returns the removed relationships.
    async fn delete(&self, id: Uuid, cascade: bool) -> StoreResult<Vec<Relationship>>;

    /// Counts all entities.
    async fn count(&self) -> StoreResult<u64>;
}

/// Storage for relationships between entities.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// All outgoing relationships of an entity, optionally filtered by type.
    async fn find_by_entity(
        &self,
        entity_id: Uuid,
        types: Option<&[RelationshipType]>,
    ) -> StoreResult<Vec<Relationship>>;

    /// Creates an edge and its opposite twin atomically. Returns the
    /// forward record.
    async fn link(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        ty: RelationshipType,
    ) -> StoreResult<Relationship>;

    /// Removes an edge and its twin atomically.
    async fn unlink(&self, relationship_id: Uuid) -> StoreResult<()>;

    /// Entity ids reachable from `entity_id` within `max_depth` hops over
    /// the given edge types.
    async fn reachable(
        &self,
        entity_id: Uuid,
        types: &[RelationshipType],
        max_depth: u32,
    ) -> StoreResult<Vec<Uuid>>;
}

/// In-memory catalog store backed by a single [`CatalogGraph`] under one
/// read-write lock.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    graph: Arc<RwLock<CatalogGraph>>,
}

impl InMemoryCatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a read-only closure against the underlying graph.
    ///
    /// Traversal helpers that want borrowed access (for example
    /// [`CatalogGraph::neighbors`]) go through here.
    pub async fn with_graph<T>(&self, f: impl FnOnce(&CatalogGraph) -> T) -> T {
        let graph = self.graph.read().await;
        f(&graph)
    }
}

#[async_trait]
impl EntityStore for InMemoryCatalogStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Entity>> {
        let graph = self.graph.read().await;
        Ok(graph.entity(id).cloned())
    }

    async fn search(&self, params: &EntitySearchParams) -> StoreResult<Vec<Entity>> {
        let graph = self.graph.read().await;
        let mut results: Vec<Entity> = graph
            .entities()
            .filter(|e| {
                params
                    .name
                    .as_ref()
                    .map(|n| e.name.to_lowercase().contains(&n.to_lowercase()))
                    .unwrap_or(true)
            })
            .filter(|e| params.kind.as_ref().map(|k| &e.kind == k).unwrap_or(true))
            .filter(|e| {
                params
                    .axis_level
                    .as_ref()
                    .map(|(axis, code)| e.level_code(*axis) == Some(code.as_str()))
                    .unwrap_or(true)
            })
            .filter(|e| {
                params
                    .tag
                    .as_ref()
                    .map(|(k, v)| e.tags.get(k) == Some(v))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        // Stable order for pagination.
        results.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));

        let offset = params.offset.unwrap_or(0);
        let limit = params.limit.unwrap_or(100);
        Ok(results.into_iter().skip(offset).take(limit).collect())
    }

    async fn create(&self, entity: &Entity) -> StoreResult<()> {
        validate_entity_write(entity).map_err(StoreError::Rejected)?;
        let mut graph = self.graph.write().await;
        graph.insert_entity(entity.clone())?;
        info!(entity_id = %entity.id, kind = %entity.kind, "entity created");
        Ok(())
    }

    async fn update(&self, entity: &Entity) -> StoreResult<()> {
        validate_entity_write(entity).map_err(StoreError::Rejected)?;
        let mut graph = self.graph.write().await;
        graph.update_entity(entity.clone())?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, cascade: bool) -> StoreResult<Vec<Relationship>> {
        let mut graph = self.graph.write().await;
        let plan = validate_entity_delete(&graph, id, cascade)?;
        let removed = graph.remove_entity(plan.entity_id)?;
        if !removed.is_empty() {
            warn!(entity_id = %id, cascaded = removed.len(), "entity deleted with cascade");
        } else {
            info!(entity_id = %id, "entity deleted");
        }
        Ok(removed)
    }

    async fn count(&self) -> StoreResult<u64> {
        let graph = self.graph.read().await;
        Ok(graph.entity_count() as u64)
    }
}

#[async_trait]
impl RelationshipStore for InMemoryCatalogStore {
    async fn find_by_entity(
        &self,
        entity_id: Uuid,
        types: Option<&[RelationshipType]>,
    ) -> StoreResult<Vec<Relationship>> {
        let graph = self.graph.read().await;
        Ok(graph
            .relationships_from(entity_id)
            .filter(|r| {
                types
                    .map(|ts| ts.contains(&r.relationship_type))
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    async fn link(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        ty: RelationshipType,
    ) -> StoreResult<Relationship> {
        // One write lock spans validation and both edge inserts, so the
        // pair is created transactionally.
        let mut graph = self.graph.write().await;
        validate_relationship_write(&graph, source_id, target_id, ty)?;
        let rel_id = graph.link(source_id, target_id, ty)?;
        let rel = graph
            .relationship(rel_id)
            .cloned()
            .ok_or_else(|| StoreError::Internal("linked edge vanished".to_string()))?;
        info!(%source_id, %target_id, relationship_type = %ty, "relationship linked");
        Ok(rel)
    }

    async fn unlink(&self, relationship_id: Uuid) -> StoreResult<()> {
        let mut graph = self.graph.write().await;
        graph.unlink(relationship_id)?;
        info!(%relationship_id, "relationship unlinked");
        Ok(())
    }

    async fn reachable(
        &self,
        entity_id: Uuid,
        types: &[RelationshipType],
        max_depth: u32,
    ) -> StoreResult<Vec<Uuid>> {
        let graph = self.graph.read().await;
        let mut ids: Vec<Uuid> = graph.reachable(entity_id, types, max_depth).into_iter().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attribute::{AttributeType, ScalarKind};
    use serde_json::json;

    #[tokio::test]
    async fn test_entity_crud() {
        let store = InMemoryCatalogStore::new();
        let mut entity = Entity::new("orders", EntityKind::Service)
            .with_assignment(ClassificationAxis::BusinessCriticality, "business_critical");

        store.create(&entity).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let found = store.find_by_id(entity.id).await.unwrap().unwrap();
        assert_eq!(found.name, "orders");

        entity.assign(ClassificationAxis::BusinessCriticality, "mission_critical");
        store.update(&entity).await.unwrap();
        let updated = store.find_by_id(entity.id).await.unwrap().unwrap();
        assert_eq!(
            updated.level_code(ClassificationAxis::BusinessCriticality),
            Some("mission_critical")
        );

        store.delete(entity.id, false).await.unwrap();
        assert!(store.find_by_id(entity.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_entity() {
        let store = InMemoryCatalogStore::new();
        let entity = Entity::new("orders", EntityKind::Service).with_attribute(
            "replicas",
            AttributeType::scalar(ScalarKind::Integer),
            json!("three"),
        );
        match store.create(&entity).await {
            Err(StoreError::Rejected(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_create() {
        let store = InMemoryCatalogStore::new();
        let entity = Entity::new("orders", EntityKind::Service);
        store.create(&entity).await.unwrap();
        assert!(matches!(
            store.create(&entity).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_search_filters_and_pagination() {
        let store = InMemoryCatalogStore::new();
        for i in 0..5 {
            let entity = Entity::new(format!("svc-{i}"), EntityKind::Service)
                .with_tag("domain", if i < 2 { "commerce" } else { "infra" });
            store.create(&entity).await.unwrap();
        }
        store
            .create(&Entity::new("payments-api", EntityKind::Api))
            .await
            .unwrap();

        let by_kind = store
            .search(&EntitySearchParams {
                kind: Some(EntityKind::Service),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_kind.len(), 5);

        let by_tag = store
            .search(&EntitySearchParams {
                tag: Some(("domain".to_string(), "commerce".to_string())),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_tag.len(), 2);

        let page = store
            .search(&EntitySearchParams {
                kind: Some(EntityKind::Service),
                limit: Some(2),
                offset: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_search_by_axis_level() {
        let store = InMemoryCatalogStore::new();
        let flagged = Entity::new("ledger", EntityKind::Service)
            .with_assignment(ClassificationAxis::DataClassification, "confidential");
        store.create(&flagged).await.unwrap();
        store
            .create(&Entity::new("wiki", EntityKind::Service))
            .await
            .unwrap();

        let results = store
            .search(&EntitySearchParams {
                axis_level: Some((
                    ClassificationAxis::DataClassification,
                    "confidential".to_string(),
                )),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, flagged.id);
    }

    #[tokio::test]
    async fn test_link_unlink_pairing() {
        let store = InMemoryCatalogStore::new();
        let a = Entity::new("a", EntityKind::Service);
        let b = Entity::new("b", EntityKind::Service);
        store.create(&a).await.unwrap();
        store.create(&b).await.unwrap();

        let rel = store
            .link(a.id, b.id, RelationshipType::DependsOn)
            .await
            .unwrap();

        let from_b = store.find_by_entity(b.id, None).await.unwrap();
        assert_eq!(from_b.len(), 1);
        assert_eq!(from_b[0].relationship_type, RelationshipType::DependencyOf);
        assert_eq!(from_b[0].target_id, a.id);

        store.unlink(rel.id).await.unwrap();
        assert!(store.find_by_entity(a.id, None).await.unwrap().is_empty());
        assert!(store.find_by_entity(b.id, None).await.unwrap().is_empty());
        assert!(matches!(
            store.unlink(rel.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_link_enforces_validation() {
        let store = InMemoryCatalogStore::new();
        let svc = Entity::new("orders", EntityKind::Service);
        let api = Entity::new("orders-api", EntityKind::Api);
        store.create(&svc).await.unwrap();
        store.create(&api).await.unwrap();

        assert!(matches!(
            store.link(svc.id, api.id, RelationshipType::MemberOf).await,
            Err(StoreError::EdgeRejected(
                RelationshipWriteError::IncompatibleTypes { .. }
            ))
        ));
        assert!(matches!(
            store.link(svc.id, svc.id, RelationshipType::DependsOn).await,
            Err(StoreError::EdgeRejected(RelationshipWriteError::SelfLoop(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_guard_and_cascade() {
        let store = InMemoryCatalogStore::new();
        let a = Entity::new("a", EntityKind::Service);
        let b = Entity::new("b", EntityKind::Service);
        store.create(&a).await.unwrap();
        store.create(&b).await.unwrap();
        store
            .link(a.id, b.id, RelationshipType::DependsOn)
            .await
            .unwrap();

        assert!(matches!(
            store.delete(a.id, false).await,
            Err(StoreError::DeleteBlocked(DeleteError::HasDependents(_)))
        ));

        let removed = store.delete(a.id, true).await.unwrap();
        assert_eq!(removed.len(), 1);
        assert!(store.find_by_entity(b.id, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reachable_through_store() {
        let store = InMemoryCatalogStore::new();
        let a = Entity::new("a", EntityKind::Service);
        let b = Entity::new("b", EntityKind::Service);
        let c = Entity::new("c", EntityKind::Service);
        for e in [&a, &b, &c] {
            store.create(e).await.unwrap();
        }
        store
            .link(a.id, b.id, RelationshipType::DependsOn)
            .await
            .unwrap();
        store
            .link(b.id, c.id, RelationshipType::DependsOn)
            .await
            .unwrap();

        let reached = store
            .reachable(a.id, &[RelationshipType::DependsOn], 5)
            .await
            .unwrap();
        assert_eq!(reached.len(), 3);
        assert!(reached.contains(&c.id));
    }
}
