//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed stores using Diesel
//! - **cache**: time-bounded snapshot of the measurement collection
//! - **forecasting**: `augurs` forecast engine
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod forecasting;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
