//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::Clock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use range_forecast::Trace;
#[cfg(debug_assertions)]
use range_forecast::doc::ApiDoc;
use range_forecast::domain::ForecastService;
#[cfg(any(test, feature = "test-support"))]
use range_forecast::domain::ports::{
    FixtureForecastEngine, FixtureForecastRepository, FixtureMeasurementRepository,
};
use range_forecast::domain::ports::{ForecastCommand, ForecastMetrics};
#[cfg(not(feature = "metrics"))]
use range_forecast::domain::ports::NoOpForecastMetrics;
use range_forecast::inbound::http::health::{HealthState, live, ready, root};
use range_forecast::inbound::http::predict::request_forecast;
use range_forecast::inbound::http::state::HttpState;
use range_forecast::outbound::cache::SnapshotMeasurementCache;
use range_forecast::outbound::forecasting::AugursForecastEngine;
use range_forecast::outbound::persistence::{
    DbPool, DieselForecastRepository, DieselMeasurementRepository,
};

/// Build the forecast use-case over Diesel-backed stores, the history
/// snapshot cache and the `augurs` engine.
///
/// # Errors
/// Returns [`io::Error`] when no pool is configured outside test builds.
fn build_forecast_command(
    db_pool: Option<&DbPool>,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn ForecastMetrics>,
) -> io::Result<Arc<dyn ForecastCommand>> {
    let Some(pool) = db_pool else {
        return without_database(&clock, &metrics);
    };
    let history = SnapshotMeasurementCache::new(
        DieselMeasurementRepository::new(pool.clone()),
        Arc::clone(&clock),
    );
    Ok(Arc::new(
        ForecastService::new(
            Arc::new(DieselForecastRepository::new(pool.clone())),
            Arc::new(history),
            Arc::new(AugursForecastEngine::new()),
            clock,
        )
        .with_metrics(metrics),
    ))
}

/// Test builds answer from empty fixture stores when no pool is attached,
/// which is enough to exercise the HTTP surface.
#[cfg(any(test, feature = "test-support"))]
fn without_database(
    clock: &Arc<dyn Clock>,
    metrics: &Arc<dyn ForecastMetrics>,
) -> io::Result<Arc<dyn ForecastCommand>> {
    info!("no database configured; serving fixture stores");
    Ok(Arc::new(
        ForecastService::new(
            Arc::new(FixtureForecastRepository),
            Arc::new(FixtureMeasurementRepository::default()),
            Arc::new(FixtureForecastEngine),
            Arc::clone(clock),
        )
        .with_metrics(Arc::clone(metrics)),
    ))
}

#[cfg(not(any(test, feature = "test-support")))]
fn without_database(
    _clock: &Arc<dyn Clock>,
    _metrics: &Arc<dyn ForecastMetrics>,
) -> io::Result<Arc<dyn ForecastCommand>> {
    Err(io::Error::other("no database pool configured"))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .wrap(Cors::permissive())
        .service(root)
        .service(request_forecast)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }
    #[cfg(not(debug_assertions))]
    {
        app
    }
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when metric registration or binding the
/// socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        clock,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::new(prometheus);
    #[cfg(feature = "metrics")]
    let forecast_metrics = metrics_layer.forecast_metrics()?;
    #[cfg(not(feature = "metrics"))]
    let forecast_metrics: Arc<dyn ForecastMetrics> = Arc::new(NoOpForecastMetrics);

    let command = build_forecast_command(db_pool.as_ref(), clock, forecast_metrics)?;
    let http_state = web::Data::new(HttpState::new(command));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());
        #[cfg(feature = "metrics")]
        {
            app.wrap(metrics_layer.clone())
        }
        #[cfg(not(feature = "metrics"))]
        {
            app
        }
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "range forecast server listening");
    health_state.mark_ready();
    Ok(server)
}
