//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the forecast endpoint, the health checks and the
//! schema wrappers from [`crate::inbound::http::schemas`]. The document is
//! served by Swagger UI in debug builds and exported by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::predict::{ForecastResponse, ForecastStatus};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Range forecast API",
        description = "Per-user range forecasts with once-per-day idempotency, plus health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::predict::request_forecast,
        crate::inbound::http::health::root,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ForecastResponse, ForecastStatus, ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "forecasts", description = "Forecast generation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
