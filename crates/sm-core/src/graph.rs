//! The in-memory relationship graph.
//!
//! Entities and relationships live in arenas keyed by id; edges are reached
//! through an adjacency index (entity id to outgoing relationship ids)
//! instead of pointer-following. Every `link` materializes the edge and its
//! opposite-direction twin in one mutation, and `unlink` removes both, so a
//! reader holding the graph never observes half a pair.

use crate::models::entity::Entity;
use crate::models::relationship::{Relationship, RelationshipType};
use crate::schema::opposites::opposite;
use chrono::Utc;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Default bound for [`CatalogGraph::reachable`] traversals.
pub const DEFAULT_TRAVERSAL_DEPTH: u32 = 5;

/// Errors from graph mutations and lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An endpoint id does not resolve to an entity.
    #[error("unknown entity {0}")]
    UnknownEntity(Uuid),
    /// An entity with this id already exists.
    #[error("entity {0} already exists")]
    DuplicateEntity(Uuid),
    /// The exact (source, target, type) triple already exists.
    #[error("edge {source_id} -[{relationship_type}]-> {target_id} already exists")]
    DuplicateEdge {
        /// Source endpoint of the offending triple.
        source_id: Uuid,
        /// Target endpoint of the offending triple.
        target_id: Uuid,
        /// Type of the offending triple.
        relationship_type: RelationshipType,
    },
    /// A relationship id is stale or was never issued.
    #[error("relationship {0} not found")]
    NotFound(Uuid),
}

/// Arena-and-index store for catalog entities and their relationships.
#[derive(Debug, Default)]
pub struct CatalogGraph {
    entities: HashMap<Uuid, Entity>,
    relationships: HashMap<Uuid, Relationship>,
    /// Entity id to outgoing relationship ids, in insertion order.
    adjacency: HashMap<Uuid, Vec<Uuid>>,
}

impl CatalogGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entity.
    pub fn insert_entity(&mut self, entity: Entity) -> Result<(), GraphError> {
        if self.entities.contains_key(&entity.id) {
            return Err(GraphError::DuplicateEntity(entity.id));
        }
        self.adjacency.entry(entity.id).or_default();
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    /// Replaces an existing entity.
    pub fn update_entity(&mut self, entity: Entity) -> Result<(), GraphError> {
        if !self.entities.contains_key(&entity.id) {
            return Err(GraphError::UnknownEntity(entity.id));
        }
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    /// Returns an entity by id.
    pub fn entity(&self, id: Uuid) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a relationship by id.
    pub fn relationship(&self, id: Uuid) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Iterates over all entities, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities in the graph.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of relationship records (both halves of each pair counted).
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Outgoing relationships of an entity, in insertion order.
    pub fn relationships_from(&self, id: Uuid) -> impl Iterator<Item = &Relationship> {
        self.adjacency
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(move |rel_id| self.relationships.get(rel_id))
    }

    /// Returns true if the exact (source, target, type) triple exists.
    pub fn edge_exists(&self, source_id: Uuid, target_id: Uuid, ty: RelationshipType) -> bool {
        self.relationships_from(source_id)
            .any(|r| r.matches(source_id, target_id, ty))
    }

    /// Creates an edge and its opposite-direction twin as one unit.
    ///
    /// Returns the id of the forward record. The twin's id is reachable
    /// through [`Relationship::pair_id`].
    pub fn link(
        &mut self,
        source_id: Uuid,
        target_id: Uuid,
        ty: RelationshipType,
    ) -> Result<Uuid, GraphError> {
        if !self.entities.contains_key(&source_id) {
            return Err(GraphError::UnknownEntity(source_id));
        }
        if !self.entities.contains_key(&target_id) {
            return Err(GraphError::UnknownEntity(target_id));
        }
        if self.edge_exists(source_id, target_id, ty) {
            return Err(GraphError::DuplicateEdge {
                source_id,
                target_id,
                relationship_type: ty,
            });
        }

        let now = Utc::now();
        let forward_id = Uuid::new_v4();
        let reverse_id = Uuid::new_v4();
        let forward = Relationship {
            id: forward_id,
            source_id,
            target_id,
            relationship_type: ty,
            pair_id: reverse_id,
            created_at: now,
        };
        let reverse = Relationship {
            id: reverse_id,
            source_id: target_id,
            target_id: source_id,
            relationship_type: opposite(ty),
            pair_id: forward_id,
            created_at: now,
        };

        self.relationships.insert(forward_id, forward);
        self.relationships.insert(reverse_id, reverse);
        self.adjacency.entry(source_id).or_default().push(forward_id);
        self.adjacency.entry(target_id).or_default().push(reverse_id);

        debug!(%source_id, %target_id, relationship_type = %ty, "linked entities");
        Ok(forward_id)
    }

    /// Removes an edge and its twin as one unit.
    ///
    /// Either half's id may be passed.
    pub fn unlink(&mut self, relationship_id: Uuid) -> Result<(), GraphError> {
        let rel = self
            .relationships
            .remove(&relationship_id)
            .ok_or(GraphError::NotFound(relationship_id))?;
        let twin = self.relationships.remove(&rel.pair_id);

        self.detach(rel.source_id, rel.id);
        if let Some(twin) = &twin {
            self.detach(twin.source_id, twin.id);
        }
        debug!(%relationship_id, "unlinked relationship pair");
        Ok(())
    }

    /// Removes an entity and every relationship touching it.
    ///
    /// Returns the removed outgoing records (one per former pair). The
    /// delete guard in the validator decides whether this may run at all.
    pub fn remove_entity(&mut self, id: Uuid) -> Result<Vec<Relationship>, GraphError> {
        if !self.entities.contains_key(&id) {
            return Err(GraphError::UnknownEntity(id));
        }
        let outgoing: Vec<Uuid> = self.adjacency.get(&id).cloned().unwrap_or_default();
        let mut removed = Vec::with_capacity(outgoing.len());
        for rel_id in outgoing {
            if let Some(rel) = self.relationships.get(&rel_id).cloned() {
                self.unlink(rel_id)?;
                removed.push(rel);
            }
        }
        self.entities.remove(&id);
        self.adjacency.remove(&id);
        debug!(entity_id = %id, removed = removed.len(), "removed entity");
        Ok(removed)
    }

    /// Directly connected entities, optionally filtered by relationship type.
    ///
    /// Order follows the adjacency index's insertion order, so repeated calls
    /// with the same inputs return the same sequence.
    pub fn neighbors(
        &self,
        id: Uuid,
        filter: Option<&[RelationshipType]>,
    ) -> Vec<(&Entity, RelationshipType)> {
        self.relationships_from(id)
            .filter(|rel| {
                filter
                    .map(|types| types.contains(&rel.relationship_type))
                    .unwrap_or(true)
            })
            .filter_map(|rel| {
                self.entities
                    .get(&rel.target_id)
                    .map(|e| (e, rel.relationship_type))
            })
            .collect()
    }

    /// Entities reachable from `id` within `max_depth` hops, following only
    /// edges whose type is in `types`.
    ///
    /// Breadth-first with a visited set, so cyclic graphs terminate. The
    /// returned set includes the starting entity.
    pub fn reachable(
        &self,
        id: Uuid,
        types: &[RelationshipType],
        max_depth: u32,
    ) -> HashSet<Uuid> {
        let mut visited = HashSet::new();
        if !self.entities.contains_key(&id) {
            return visited;
        }
        visited.insert(id);
        let mut frontier = VecDeque::new();
        frontier.push_back((id, 0u32));
        while let Some((current, depth)) = frontier.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for rel in self.relationships_from(current) {
                if !types.contains(&rel.relationship_type) {
                    continue;
                }
                if visited.insert(rel.target_id) {
                    frontier.push_back((rel.target_id, depth + 1));
                }
            }
        }
        visited
    }

    fn detach(&mut self, entity_id: Uuid, relationship_id: Uuid) {
        if let Some(ids) = self.adjacency.get_mut(&entity_id) {
            ids.retain(|r| *r != relationship_id);
        }
    }
}
