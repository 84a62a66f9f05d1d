//! Domain port for recording pipeline outcomes.
//!
//! Implementations may export to Prometheus or discard everything; the
//! pipeline never fails because a metric could not be written.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording forecast metrics.
    pub enum ForecastMetricsError {
        /// Metric exporter rejected the write.
        Export { message } => "forecast metrics exporter failed: {message}",
    }
}

/// Outcome of one forecast request, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastDecision {
    /// A run for today already existed.
    AlreadyProcessed,
    /// Too little usable history.
    InsufficientData,
    /// The forecast store held records without an owner.
    MalformedStore,
    /// A new run was computed and persisted.
    Submitted,
}

impl ForecastDecision {
    /// Stable label value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyProcessed => "already_processed",
            Self::InsufficientData => "insufficient_data",
            Self::MalformedStore => "malformed_store",
            Self::Submitted => "submitted",
        }
    }
}

/// Metrics recording port for the forecast pipeline.
#[async_trait]
pub trait ForecastMetrics: Send + Sync {
    /// Record the outcome of a request.
    async fn record_decision(&self, decision: ForecastDecision)
    -> Result<(), ForecastMetricsError>;

    /// Record how many forecast rows a run wrote.
    async fn record_rows_written(&self, rows: usize) -> Result<(), ForecastMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpForecastMetrics;

#[async_trait]
impl ForecastMetrics for NoOpForecastMetrics {
    async fn record_decision(
        &self,
        _decision: ForecastDecision,
    ) -> Result<(), ForecastMetricsError> {
        Ok(())
    }

    async fn record_rows_written(&self, _rows: usize) -> Result<(), ForecastMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ForecastDecision::AlreadyProcessed, "already_processed")]
    #[case(ForecastDecision::InsufficientData, "insufficient_data")]
    #[case(ForecastDecision::MalformedStore, "malformed_store")]
    #[case(ForecastDecision::Submitted, "submitted")]
    fn decision_labels_are_stable(#[case] decision: ForecastDecision, #[case] label: &str) {
        assert_eq!(decision.as_str(), label);
    }

    #[tokio::test]
    async fn noop_accepts_everything() {
        let metrics = NoOpForecastMetrics;
        assert!(
            metrics
                .record_decision(ForecastDecision::Submitted)
                .await
                .is_ok()
        );
        assert!(metrics.record_rows_written(30).await.is_ok());
    }
}
