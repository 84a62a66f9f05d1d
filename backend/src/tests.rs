//! Tests for the application bootstrap, covering metrics initialisation and
//! readiness signalling.

use std::net::SocketAddr;

use actix_web::web;
use rstest::{fixture, rstest};

#[cfg(feature = "metrics")]
use super::{PrometheusMetricsBuilder, initialize_metrics};
use super::{HealthState, ServerConfig, create_server};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[cfg(feature = "metrics")]
#[test]
fn initialize_metrics_returns_none_on_error() {
    let metrics = initialize_metrics(|| -> Result<_, &str> { Err("boom") });
    assert!(metrics.is_none(), "expected metrics to be absent on error");
}

#[cfg(feature = "metrics")]
#[test]
fn initialize_metrics_returns_metrics_on_success() {
    let metrics = initialize_metrics(|| {
        PrometheusMetricsBuilder::new("test")
            .endpoint("/metrics")
            .build()
    });

    assert!(metrics.is_some(), "expected metrics to be present on success");
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_without_database(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(health_state.clone(), ServerConfig::new(bind_address))
        .expect("server should build with fixture stores");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[cfg(feature = "metrics")]
#[rstest]
#[actix_rt::test]
async fn create_server_registers_forecast_metrics(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
) {
    let prometheus = PrometheusMetricsBuilder::new("test")
        .endpoint("/metrics")
        .build()
        .expect("metrics should build for tests");
    let registry = prometheus.registry.clone();

    let _server = create_server(
        health_state,
        ServerConfig::new(bind_address).with_metrics(Some(prometheus)),
    )
    .expect("server should build with metrics");

    registry
        .register(Box::new(
            prometheus::Counter::new("range_forecast_rows_written_total", "duplicate")
                .expect("counter builds"),
        ))
        .expect_err("forecast counters are already registered");
}
