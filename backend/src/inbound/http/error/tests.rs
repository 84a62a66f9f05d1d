//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::Error;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::insufficient_history("few"), StatusCode::BAD_REQUEST)]
#[case(Error::malformed_forecast_store("schema"), StatusCode::BAD_REQUEST)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn body_json(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("read response body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, header, value)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = body_json(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["traceId"], expected_trace_id.as_str());
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::insufficient_history("Not enough data to process")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"available": 5, "required": 7}));

    let (status, header, body) = body_json(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["code"], "insufficient_history");
    assert_eq!(body["message"], "Not enough data to process");
    assert_eq!(body["details"]["required"], 7);
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_header() {
    let (_, header, body) = body_json(&Error::invalid_request("bad")).await;
    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}
