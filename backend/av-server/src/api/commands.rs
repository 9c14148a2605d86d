use crate::{ApiError, ApiResult, ServerState};

use av_core::{Identity, command_type};

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::Uri,
};
use bytes::Bytes;
use log::debug;
use serde_json::Value;

const UNKNOWN_COMMAND: &str = "unknown";

/// POST /api/device/... - run a device command and announce it to every
/// viewer once it succeeds
pub async fn execute_command(
    State(state): State<ServerState>,
    Extension(caller): Extension<Identity>,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let command = command_type("POST", uri.path());
    if command == UNKNOWN_COMMAND {
        return Err(ApiError::not_found(format!("No device command at {}", uri.path())));
    }

    let payload = parse_payload(&body)?;
    debug!("{caller} executing {command}");

    let result = state.device.execute(&command, payload.as_ref()).await?;

    state
        .ws
        .hub
        .broadcast_command_executed(&caller.user_id, &caller.username, &command, payload);

    Ok(Json(result))
}

/// GET /api/device/controls/{id} - read one control value
pub async fn query_control(
    State(state): State<ServerState>,
    Path(control_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let command = command_type("GET", &format!("/api/device/controls/{control_id}"));
    if command == UNKNOWN_COMMAND {
        return Err(ApiError::not_found(format!("No control {control_id}")));
    }

    Ok(Json(state.device.execute(&command, None).await?))
}

/// Empty bodies carry no payload; anything else must be JSON
fn parse_payload(body: &Bytes) -> ApiResult<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}
