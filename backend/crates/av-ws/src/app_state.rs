use crate::{Client, ConnectionConfig, HubHandle, Metrics};

use av_auth::JwtValidator;
use av_core::Identity;

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use futures::StreamExt;
use log::{debug, error, warn};
use serde::Deserialize;

const DEFAULT_VIEWER_ROLE: &str = "viewer";

/// Shared state for the live viewer endpoint
#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
    /// `None` when authentication is disabled
    pub jwt_validator: Option<Arc<JwtValidator>>,
    pub config: ConnectionConfig,
    pub metrics: Metrics,
}

/// Query string of the upgrade request
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
    // Only honoured while authentication is disabled
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let identity = resolve_identity(&params, state.jwt_validator.as_deref())?;
    debug!("WebSocket upgrade request from {identity}");

    Ok(ws
        .max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, identity, state)))
}

/// Register with the hub and run the pumps until the connection ends
async fn handle_socket(socket: WebSocket, identity: Identity, state: AppState) {
    let registration = match state.hub.register(identity).await {
        Ok(registration) => registration,
        Err(e) => {
            error!("Failed to register connection: {e}");
            return;
        }
    };

    let (sink, stream) = socket.split();
    Client::new(
        registration.id,
        registration.identity,
        state.hub.clone(),
        state.config.clone(),
        state.metrics.clone(),
    )
    .run(registration.mailbox, sink, stream)
    .await;
}

/// Identity from the `token` query parameter, or from the plain
/// `user_id`/`username`/`role` parameters when no validator is configured.
pub fn resolve_identity(
    params: &ConnectParams,
    validator: Option<&JwtValidator>,
) -> Result<Identity, StatusCode> {
    let Some(validator) = validator else {
        let user_id = params
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                warn!("Missing user_id on unauthenticated connection");
                StatusCode::UNAUTHORIZED
            })?;
        let username = params.username.as_deref().unwrap_or(user_id);
        let role = params.role.as_deref().unwrap_or(DEFAULT_VIEWER_ROLE);
        return Ok(Identity::new(user_id, username, role));
    };

    let token = params.token.as_deref().unwrap_or_default();
    let claims = validator.validate(token).map_err(|e| {
        warn!("Token validation failed ({}): {e}", e.error_code());
        StatusCode::UNAUTHORIZED
    })?;

    Ok(claims.identity())
}
