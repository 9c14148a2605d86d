use crate::{ServerState, api::error::CommandFailure, resolve_caller};

use av_core::{CommandLogEntry, command_type, should_audit};

use std::net::SocketAddr;

use axum::{
    body::{Body, to_bytes},
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

/// Largest request body buffered for the audit trail
const MAX_AUDITED_BODY: usize = 1024 * 1024;

const UNKNOWN_CLIENT: &str = "unknown";

/// Audit every device command.
///
/// Resolves the caller (rejecting the request when that fails), runs the
/// handler and queues one audit entry with the outcome and timing. The
/// caller [`av_core::Identity`] is made available to handlers as an
/// extension.
pub async fn audit_commands(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    let caller = match resolve_caller(request.headers(), &state) {
        Ok(caller) => caller,
        Err(e) => return e.into_response(),
    };

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let (mut parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_AUDITED_BODY).await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Rejecting {method} {path}: {e}");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };
    let payload = if method == Method::POST || method == Method::PUT {
        String::from_utf8_lossy(&body).into_owned()
    } else {
        String::new()
    };

    parts.extensions.insert(caller.clone());
    let request = Request::from_parts(parts, Body::from(body));

    let started = Instant::now();
    let response = next.run(request).await;

    if !should_audit(&path) {
        return response;
    }

    let elapsed_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
    let command = command_type(method.as_str(), &path);
    let mut entry = CommandLogEntry::success(&caller, command, payload, elapsed_ms, client_ip);

    if !response.status().is_success() {
        let message = response
            .extensions()
            .get::<CommandFailure>()
            .map(|CommandFailure(message)| message.clone())
            .unwrap_or_else(|| response.status().to_string());
        entry = entry.failed(message);
    }

    state.audit.log_command(entry);
    response
}
