//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed implementations of domain metrics ports, gated behind
//! the `metrics` feature.

mod prometheus_forecast;

pub use prometheus_forecast::PrometheusForecastMetrics;
