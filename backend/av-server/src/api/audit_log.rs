use crate::{ApiResult, ServerState, resolve_caller};

use av_core::CommandLog;
use av_db::CommandLogRepository;

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct RecentLogsQuery {
    pub limit: Option<i64>,
}

/// GET /api/audit/logs - most recent persisted command logs, newest first
pub async fn recent_logs(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<RecentLogsQuery>,
) -> ApiResult<Json<Vec<CommandLog>>> {
    resolve_caller(&headers, &state)?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let logs = CommandLogRepository::recent(&state.pool, limit).await?;
    Ok(Json(logs))
}
