use crate::{
    ServerState, audit_commands, device_status, execute_command, health, query_control,
    recent_logs,
};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: ServerState) -> Router {
    // Every device route runs through the audit layer
    let device = Router::new()
        .route("/api/device/status", get(device_status))
        .route(
            "/api/device/controls/{id}",
            get(query_control).post(execute_command),
        )
        .route("/api/device/{*command}", post(execute_command))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            audit_commands,
        ));

    Router::new()
        // Live viewer endpoint
        .route("/ws", get(av_ws::handler))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/api/audit/logs", get(recent_logs))
        .merge(device)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
