use crate::{ApiError, ServerState};

use av_core::Identity;

use axum::http::HeaderMap;

const USER_ID_HEADER: &str = "x-user-id";
const USERNAME_HEADER: &str = "x-username";
const ROLE_HEADER: &str = "x-user-role";

/// Identity used for unauthenticated requests without identity headers
const LOCAL_USER_ID: &str = "local";
const LOCAL_ROLE: &str = "operator";

/// Caller identity for REST requests.
///
/// With authentication enabled the `Authorization: Bearer` token is
/// required. Otherwise the `X-User-Id`/`X-Username`/`X-User-Role` headers
/// are trusted, falling back to a local operator.
pub fn resolve_caller(headers: &HeaderMap, state: &ServerState) -> Result<Identity, ApiError> {
    let Some(validator) = state.ws.jwt_validator.as_deref() else {
        let user_id = header(headers, USER_ID_HEADER).unwrap_or(LOCAL_USER_ID);
        let username = header(headers, USERNAME_HEADER).unwrap_or(user_id);
        let role = header(headers, ROLE_HEADER).unwrap_or(LOCAL_ROLE);
        return Ok(Identity::new(user_id, username, role));
    };

    let auth_header = header(headers, "authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization scheme: expected 'Bearer'"))?;

    let claims = validator
        .validate(token)
        .map_err(|e| ApiError::unauthorized(format!("{} ({})", e, e.error_code())))?;

    Ok(claims.identity())
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
