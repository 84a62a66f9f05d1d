//! Forecast request handler.
//!
//! ```text
//! POST /predict/{userId}  Generate and store a range forecast for a user
//! ```

use actix_web::{post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::ForecastOutcome;
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Whether the request produced a new forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    /// A run for today already exists; nothing was computed.
    AlreadyProcessed,
    /// A new run was computed and stored.
    Submitted,
}

/// Successful forecast response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    /// Outcome of the request.
    pub status: ForecastStatus,
    /// Human-readable summary.
    #[schema(example = "Data has been submitted to Database")]
    pub message: String,
    /// Rows written by this run; absent when nothing was computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 30)]
    pub inserted: Option<usize>,
    /// UTC calendar date the run is recorded under.
    pub generation_date: NaiveDate,
}

impl From<ForecastOutcome> for ForecastResponse {
    fn from(value: ForecastOutcome) -> Self {
        match value {
            ForecastOutcome::AlreadyProcessed { generation_date } => Self {
                status: ForecastStatus::AlreadyProcessed,
                message: "Data has already been processed for this date and user".to_owned(),
                inserted: None,
                generation_date,
            },
            ForecastOutcome::Submitted {
                inserted,
                generation_date,
            } => Self {
                status: ForecastStatus::Submitted,
                message: "Data has been submitted to Database".to_owned(),
                inserted: Some(inserted),
                generation_date,
            },
        }
    }
}

fn parse_user_id(raw: String) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "userId" }))
    })
}

/// Generate a 30-day range forecast for a user, at most once per UTC day.
#[utoipa::path(
    post,
    path = "/predict/{userId}",
    params(
        ("userId" = String, Path, description = "Owner of the measurements to forecast")
    ),
    responses(
        (status = 200, description = "Forecast submitted or already processed today", body = ForecastResponse),
        (status = 400, description = "Invalid user id, insufficient history or malformed forecast store", body = ErrorSchema),
        (status = 500, description = "Forecast engine or store fault", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["forecasts"],
    operation_id = "requestForecast"
)]
#[post("/predict/{userId}")]
pub async fn request_forecast(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ForecastResponse>> {
    let user_id = parse_user_id(path.into_inner())?;
    let outcome = state.forecasts.request_forecast(&user_id).await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "predict_tests.rs"]
mod tests;
