//! Range forecast service library.
//!
//! Hexagonal layout: [`domain`] holds the pipeline and its ports,
//! [`inbound`] the HTTP adapter and [`outbound`] the store, engine, cache
//! and metrics adapters.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
