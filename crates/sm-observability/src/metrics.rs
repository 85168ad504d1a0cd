//! Metrics for the catalog core.
//!
//! Counters and histograms emitted through the `metrics` crate; the hosting
//! process decides on the exporter (Prometheus in production). Call
//! [`describe_catalog_metrics`] once at startup so exporters carry the help
//! texts.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use sm_core::{EntityKind, RelationshipType};

/// Metric names emitted by the catalog.
pub mod names {
    /// Entities created, labeled by kind.
    pub const ENTITIES_CREATED: &str = "servicemap_entities_created_total";
    /// Entities deleted, labeled by cascade.
    pub const ENTITIES_DELETED: &str = "servicemap_entities_deleted_total";
    /// Relationship pairs linked, labeled by type.
    pub const RELATIONSHIPS_LINKED: &str = "servicemap_relationships_linked_total";
    /// Relationship pairs unlinked.
    pub const RELATIONSHIPS_UNLINKED: &str = "servicemap_relationships_unlinked_total";
    /// Writes rejected by the validator, labeled by class.
    pub const VALIDATION_FAILURES: &str = "servicemap_validation_failures_total";
    /// Governance profiles derived, labeled by tier.
    pub const PROFILES_DERIVED: &str = "servicemap_profiles_derived_total";
    /// Entities visited per reachability traversal.
    pub const TRAVERSAL_VISITED: &str = "servicemap_traversal_visited_entities";
}

/// Registers help texts for every catalog metric.
pub fn describe_catalog_metrics() {
    describe_counter!(names::ENTITIES_CREATED, "Entities created");
    describe_counter!(names::ENTITIES_DELETED, "Entities deleted");
    describe_counter!(names::RELATIONSHIPS_LINKED, "Relationship pairs linked");
    describe_counter!(
        names::RELATIONSHIPS_UNLINKED,
        "Relationship pairs unlinked"
    );
    describe_counter!(
        names::VALIDATION_FAILURES,
        "Writes rejected by the consistency validator"
    );
    describe_counter!(names::PROFILES_DERIVED, "Governance profiles derived");
    describe_histogram!(
        names::TRAVERSAL_VISITED,
        "Entities visited per reachability traversal"
    );
}

/// Emits catalog events as metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Creates the emitter.
    pub fn new() -> Self {
        Self
    }

    /// Records an entity creation.
    pub fn entity_created(&self, kind: &EntityKind) {
        counter!(names::ENTITIES_CREATED, "kind" => kind.code().to_string()).increment(1);
    }

    /// Records an entity deletion.
    pub fn entity_deleted(&self, cascaded: usize) {
        let label = if cascaded > 0 { "cascade" } else { "plain" };
        counter!(names::ENTITIES_DELETED, "mode" => label).increment(1);
    }

    /// Records a linked relationship pair.
    pub fn relationship_linked(&self, ty: RelationshipType) {
        counter!(names::RELATIONSHIPS_LINKED, "type" => ty.label()).increment(1);
    }

    /// Records an unlinked relationship pair.
    pub fn relationship_unlinked(&self) {
        counter!(names::RELATIONSHIPS_UNLINKED).increment(1);
    }

    /// Records a rejected write.
    pub fn validation_failure(&self, class: &'static str) {
        counter!(names::VALIDATION_FAILURES, "class" => class).increment(1);
    }

    /// Records a derived governance profile.
    pub fn profile_derived(&self, tier: &str) {
        counter!(names::PROFILES_DERIVED, "tier" => tier.to_string()).increment(1);
    }

    /// Records a reachability traversal.
    pub fn traversal(&self, visited: usize) {
        histogram!(names::TRAVERSAL_VISITED).record(visited as f64);
    }
}
