use crate::ServerState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - process status with live viewer and audit counters
pub async fn health(State(state): State<ServerState>) -> Response {
    let audit = state.audit.stats();

    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "websocket": {
                "clients": state.ws.hub.client_count(),
            },
            "audit": {
                "accepted": audit.accepted,
                "rejected": audit.rejected,
                "persisted": audit.persisted,
                "failed": audit.failed,
                "discarded": audit.discarded,
            },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}
