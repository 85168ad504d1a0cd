//! # sm-observability
//!
//! Logging, metrics, and audit infrastructure for ServiceMap.
//!
//! Structured logging through tracing, counters and histograms through the
//! `metrics` crate, and a bounded audit trail for catalog mutations.

pub mod audit;
pub mod logging;
pub mod metrics;

pub use audit::{
    AuditEntry, AuditLog, AuditOutcome, CatalogEventType, DEFAULT_AUDIT_CAPACITY,
};
pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
pub use metrics::{describe_catalog_metrics, CatalogMetrics};
