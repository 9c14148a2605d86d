use crate::DeviceCommands;

use av_audit::AuditLogger;
use av_core::StatusProvider;

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

/// Everything the HTTP handlers share
#[derive(Clone)]
pub struct ServerState {
    /// Live viewer endpoint state (hub, token validator, connection limits)
    pub ws: av_ws::AppState,
    pub audit: AuditLogger,
    pub device: Arc<dyn DeviceCommands>,
    pub status: Arc<dyn StatusProvider>,
    pub pool: SqlitePool,
}

impl FromRef<ServerState> for av_ws::AppState {
    fn from_ref(state: &ServerState) -> Self {
        state.ws.clone()
    }
}
