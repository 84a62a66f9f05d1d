//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their serialised shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The user id in the route is unusable.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The user has fewer usable measurements than the model needs.
    #[schema(rename = "insufficient_history")]
    InsufficientHistory,
    /// Stored forecasts are missing their `userId`.
    #[schema(rename = "malformed_forecast_store")]
    MalformedForecastStore,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "insufficient_history")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Not enough data to process")]
    message: String,
    /// Correlation identifier, repeated from the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
