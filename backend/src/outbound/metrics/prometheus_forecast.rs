//! Prometheus adapter for forecast pipeline metrics.
//!
//! Counters are registered with a provided registry and exposed via the
//! `/metrics` endpoint.

use async_trait::async_trait;
use prometheus::{Counter, CounterVec, Opts, Registry};

use crate::domain::ports::{ForecastDecision, ForecastMetrics, ForecastMetricsError};

/// Prometheus-backed forecast metrics recorder.
///
/// # Metric Specification
///
/// - `range_forecast_requests_total` (counter), label `decision`:
///   `already_processed`, `insufficient_data`, `malformed_store` or
///   `submitted`.
/// - `range_forecast_rows_written_total` (counter): forecast records
///   inserted across all runs.
pub struct PrometheusForecastMetrics {
    requests_total: CounterVec,
    rows_written_total: Counter,
}

impl PrometheusForecastMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new(
                "range_forecast_requests_total",
                "Forecast requests by idempotency decision",
            ),
            &["decision"],
        )?;
        let rows_written_total = Counter::with_opts(Opts::new(
            "range_forecast_rows_written_total",
            "Forecast records inserted",
        ))?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(rows_written_total.clone()))?;
        Ok(Self {
            requests_total,
            rows_written_total,
        })
    }
}

#[async_trait]
impl ForecastMetrics for PrometheusForecastMetrics {
    async fn record_decision(
        &self,
        decision: ForecastDecision,
    ) -> Result<(), ForecastMetricsError> {
        self.requests_total
            .with_label_values(&[decision.as_str()])
            .inc();
        Ok(())
    }

    async fn record_rows_written(&self, rows: usize) -> Result<(), ForecastMetricsError> {
        let rows = u32::try_from(rows)
            .map_err(|_| ForecastMetricsError::export(format!("row count {rows} overflows")))?;
        self.rows_written_total.inc_by(f64::from(rows));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_both_metrics() {
        let registry = Registry::new();
        let metrics =
            PrometheusForecastMetrics::new(&registry).expect("metric registration should succeed");
        metrics.requests_total.with_label_values(&["submitted"]).inc();

        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|family| family.name().to_owned())
            .collect();
        assert!(names.iter().any(|n| n == "range_forecast_requests_total"));
        assert!(names.iter().any(|n| n == "range_forecast_rows_written_total"));
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        PrometheusForecastMetrics::new(&registry).expect("first registration");
        assert!(PrometheusForecastMetrics::new(&registry).is_err());
    }

    #[tokio::test]
    async fn decisions_increment_their_label() {
        let registry = Registry::new();
        let metrics =
            PrometheusForecastMetrics::new(&registry).expect("metric registration should succeed");

        metrics
            .record_decision(ForecastDecision::AlreadyProcessed)
            .await
            .expect("recording should succeed");
        metrics
            .record_decision(ForecastDecision::AlreadyProcessed)
            .await
            .expect("recording should succeed");

        let counter = metrics
            .requests_total
            .with_label_values(&["already_processed"]);
        assert_eq!(counter.get() as u64, 2);
    }

    #[tokio::test]
    async fn rows_accumulate() {
        let registry = Registry::new();
        let metrics =
            PrometheusForecastMetrics::new(&registry).expect("metric registration should succeed");

        metrics.record_rows_written(30).await.expect("recorded");
        metrics.record_rows_written(0).await.expect("recorded");

        assert_eq!(metrics.rows_written_total.get() as u64, 30);
    }
}
