use crate::{ApiResult, ServerState};

use av_core::StatusSnapshot;

use axum::{Json, extract::State};

/// GET /api/device/status - current device snapshot, passed through as-is
pub async fn device_status(State(state): State<ServerState>) -> ApiResult<Json<StatusSnapshot>> {
    Ok(Json(state.status.snapshot().await?))
}
