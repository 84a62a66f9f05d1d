//! Range forecast service entry-point: configuration, migrations, and the
//! HTTP server.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use color_eyre::eyre::WrapErr;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use range_forecast::config::{AppSettings, DeploymentMode};
use range_forecast::inbound::http::health::HealthState;
use range_forecast::outbound::persistence::{DbPool, run_pending_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let env = DefaultEnv::new();
    let mode = DeploymentMode::from_env(&env);
    let dotenv = mode.loads_dotenv().then(dotenvy::dotenv);

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    match dotenv {
        Some(Ok(path)) => info!(path = %path.display(), "loaded .env"),
        Some(Err(e)) if !e.not_found() => warn!(error = %e, "failed to load .env"),
        _ => {}
    }

    let settings = AppSettings::from_env(&env).wrap_err("invalid configuration")?;
    info!(mode = ?settings.mode, "starting range forecast service");

    let database_url = settings.database_url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("database migrations failed")?;

    let pool = DbPool::connect(&settings.database_url)
        .await
        .wrap_err("failed to build database pool")?;

    let config = with_prometheus(ServerConfig::new(settings.bind_addr).with_db_pool(pool));
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

#[cfg(feature = "metrics")]
fn with_prometheus(config: ServerConfig) -> ServerConfig {
    config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("range_forecast")
            .endpoint("/metrics")
            .build()
    }))
}

#[cfg(not(feature = "metrics"))]
const fn with_prometheus(config: ServerConfig) -> ServerConfig {
    config
}

/// Run `make`, logging and discarding failures so the server still starts
/// without metrics.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(make: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match make() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "Prometheus metrics disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests;
