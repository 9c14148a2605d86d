use crate::ApiError;
use crate::api::error::CommandFailure;

use av_core::CoreError;

use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use serde_json::Value;

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn given_not_found_when_rendered_then_404_with_json_body() {
    let response = ApiError::not_found("No device command at /api/device/bogus").into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "No device command at /api/device/bogus");
}

#[tokio::test]
async fn given_device_failure_when_converted_then_502_hardware_error() {
    let error = ApiError::from(CoreError::device("recorder already running"));

    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"]["code"], "HARDWARE_ERROR");
}

#[tokio::test]
async fn given_validation_failure_when_converted_then_400() {
    let response = ApiError::from(CoreError::validation("unknown preset 9")).into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn given_storage_failure_when_converted_then_500() {
    let response = ApiError::from(CoreError::storage("disk full")).into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn given_error_response_when_rendered_then_failure_message_is_attached() {
    let response = ApiError::unauthorized("Missing Authorization header").into_response();

    let failure = response.extensions().get::<CommandFailure>().unwrap();
    assert_eq!(failure.0, "Missing Authorization header");
}
