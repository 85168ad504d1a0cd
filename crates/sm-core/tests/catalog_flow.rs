//! End-to-end flow through the in-memory catalog store: schema self-check,
//! entity writes, linking, traversal, and the delete guard.

use serde_json::json;
use sm_core::schema;
use sm_core::{
    AttributeType, ClassificationAxis, DeleteError, Entity, EntityKind, EntitySearchParams,
    EntityStore, InMemoryCatalogStore, RelationshipStore, RelationshipType, ScalarKind,
    StoreError, DEFAULT_TRAVERSAL_DEPTH,
};

#[test]
fn schema_self_check_passes_at_startup() {
    schema::self_check().expect("static schema tables must be consistent");
}

#[tokio::test]
async fn full_catalog_lifecycle() {
    let store = InMemoryCatalogStore::new();

    let team = Entity::new("commerce", EntityKind::Team);
    let api = Entity::new("payments-api", EntityKind::Api)
        .with_assignment(ClassificationAxis::CommunicationStyle, "rest");
    let service = Entity::new("orders", EntityKind::Service)
        .with_description("Order management")
        .with_attribute(
            "replicas",
            AttributeType::scalar(ScalarKind::Integer),
            json!(3),
        )
        .with_attribute(
            "endpoints",
            AttributeType::array_of(ScalarKind::String),
            json!(["/orders", "/orders/{id}"]),
        )
        .with_assignment(ClassificationAxis::BusinessCriticality, "mission_critical")
        .with_assignment(ClassificationAxis::DataClassification, "confidential");

    for entity in [&team, &api, &service] {
        store.create(entity).await.unwrap();
    }
    assert_eq!(store.count().await.unwrap(), 3);

    // Wire up the graph: service consumes the API and is owned by the team.
    let consumes = store
        .link(service.id, api.id, RelationshipType::ConsumesApi)
        .await
        .unwrap();
    store
        .link(service.id, team.id, RelationshipType::OwnedBy)
        .await
        .unwrap();

    // The API sees the inverse edge without anyone writing it explicitly.
    let api_edges = store
        .find_by_entity(api.id, Some(&[RelationshipType::ApiConsumedBy]))
        .await
        .unwrap();
    assert_eq!(api_edges.len(), 1);
    assert_eq!(api_edges[0].target_id, service.id);

    // Detail pages filter by axis assignment.
    let confidential = store
        .search(&EntitySearchParams {
            axis_level: Some((
                ClassificationAxis::DataClassification,
                "confidential".to_string(),
            )),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(confidential.len(), 1);
    assert_eq!(confidential[0].id, service.id);

    // Deleting the service is blocked until its edges are gone or cascaded.
    match store.delete(service.id, false).await {
        Err(StoreError::DeleteBlocked(DeleteError::HasDependents(rels))) => {
            assert_eq!(rels.len(), 2);
        }
        other => panic!("expected delete guard, got {other:?}"),
    }

    store.unlink(consumes.id).await.unwrap();
    let removed = store.delete(service.id, true).await.unwrap();
    assert_eq!(removed.len(), 1);

    // Nothing dangles.
    assert!(store.find_by_entity(api.id, None).await.unwrap().is_empty());
    assert!(store.find_by_entity(team.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn impact_query_over_dependency_chain() {
    let store = InMemoryCatalogStore::new();
    let names = ["edge", "gateway", "orders", "ledger", "archive"];
    let mut ids = Vec::new();
    for name in names {
        let entity = Entity::new(name, EntityKind::Service);
        ids.push(entity.id);
        store.create(&entity).await.unwrap();
    }
    for pair in ids.windows(2) {
        store
            .link(pair[0], pair[1], RelationshipType::DependsOn)
            .await
            .unwrap();
    }
    // A cycle through misconfiguration must not hang the query.
    store
        .link(ids[4], ids[0], RelationshipType::DependsOn)
        .await
        .unwrap();

    let reached = store
        .reachable(
            ids[0],
            &[RelationshipType::DependsOn],
            DEFAULT_TRAVERSAL_DEPTH,
        )
        .await
        .unwrap();
    assert_eq!(reached.len(), ids.len());

    // The inverse direction answers "what breaks if this goes down".
    let dependents = store
        .reachable(ids[2], &[RelationshipType::DependencyOf], 1)
        .await
        .unwrap();
    assert!(dependents.contains(&ids[1]));
    assert!(!dependents.contains(&ids[0]));
}

#[tokio::test]
async fn neighbors_are_stable_across_reads() {
    let store = InMemoryCatalogStore::new();
    let hub = Entity::new("hub", EntityKind::Service);
    store.create(&hub).await.unwrap();
    let mut spoke_ids = Vec::new();
    for i in 0..10 {
        let spoke = Entity::new(format!("spoke-{i}"), EntityKind::Service);
        spoke_ids.push(spoke.id);
        store.create(&spoke).await.unwrap();
        store
            .link(hub.id, spoke.id, RelationshipType::DependsOn)
            .await
            .unwrap();
    }

    let first = store
        .with_graph(|g| {
            g.neighbors(hub.id, None)
                .into_iter()
                .map(|(e, _)| e.id)
                .collect::<Vec<_>>()
        })
        .await;
    let second = store
        .with_graph(|g| {
            g.neighbors(hub.id, None)
                .into_iter()
                .map(|(e, _)| e.id)
                .collect::<Vec<_>>()
        })
        .await;
    assert_eq!(first, second);
    assert_eq!(first, spoke_ids);
}

#[tokio::test]
async fn concurrent_readers_never_see_half_a_pair() {
    use std::sync::Arc;

    let store = Arc::new(InMemoryCatalogStore::new());
    let a = Entity::new("a", EntityKind::Service);
    let b = Entity::new("b", EntityKind::Service);
    store.create(&a).await.unwrap();
    store.create(&b).await.unwrap();

    let writer = {
        let store = Arc::clone(&store);
        let (a, b) = (a.id, b.id);
        tokio::spawn(async move {
            for _ in 0..50 {
                let rel = store.link(a, b, RelationshipType::DependsOn).await.unwrap();
                store.unlink(rel.id).await.unwrap();
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        let (a, b) = (a.id, b.id);
        tokio::spawn(async move {
            for _ in 0..200 {
                let (out_a, out_b) = store
                    .with_graph(|g| {
                        (g.neighbors(a, None).len(), g.neighbors(b, None).len())
                    })
                    .await;
                // Both halves exist or neither does.
                assert_eq!(out_a, out_b);
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}
