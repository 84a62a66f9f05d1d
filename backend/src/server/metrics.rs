//! Prometheus wiring for the forecast server.
//!
//! One [`MetricsLayer`] owns the `actix-web-prom` middleware and hands out
//! the forecast counters registered on the same registry, so `/metrics`
//! reports HTTP traffic and idempotency decisions side by side. When
//! Prometheus failed to initialise the layer still boxes response bodies,
//! which keeps the app type identical in both cases.

use std::io;
use std::sync::Arc;

use actix_service::boxed::{self, BoxService};
use actix_service::{Service, ServiceExt as _, Transform};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::{LocalBoxFuture, ready};
use tracing::info;

use range_forecast::domain::ports::{ForecastMetrics, NoOpForecastMetrics};
use range_forecast::outbound::metrics::PrometheusForecastMetrics;

type BoxedForecastService = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

/// Prometheus middleware plus the forecast counter sink.
#[derive(Clone)]
pub(crate) struct MetricsLayer {
    prometheus: Option<Arc<PrometheusMetrics>>,
}

impl MetricsLayer {
    pub(crate) fn new(prometheus: Option<PrometheusMetrics>) -> Self {
        Self {
            prometheus: prometheus.map(Arc::new),
        }
    }

    /// Register the forecast counters next to the HTTP metrics.
    ///
    /// # Errors
    /// Returns [`io::Error`] when a counter name is already registered.
    pub(crate) fn forecast_metrics(&self) -> io::Result<Arc<dyn ForecastMetrics>> {
        let Some(prometheus) = &self.prometheus else {
            info!("Prometheus unavailable; forecast decisions are not exported");
            return Ok(Arc::new(NoOpForecastMetrics));
        };
        let metrics = PrometheusForecastMetrics::new(&prometheus.registry).map_err(|err| {
            io::Error::other(format!("forecast metrics registration failed: {err}"))
        })?;
        Ok(Arc::new(metrics))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedForecastService;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(prometheus) = &self.prometheus else {
            let passthrough = service.map(ServiceResponse::map_into_boxed_body);
            return Box::pin(ready(Ok(boxed::service(passthrough))));
        };
        let pending = Compat::new(PrometheusMetrics::clone(prometheus)).new_transform(service);
        Box::pin(async move { Ok(boxed::service(pending.await?)) })
    }
}
