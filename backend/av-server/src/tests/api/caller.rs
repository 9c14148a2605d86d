use crate::tests::{TEST_JWT_SECRET, idle_state};
use crate::resolve_caller;

use av_auth::{Claims, JwtValidator};

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        headers.insert(*name, HeaderValue::from_str(value).unwrap());
    }
    headers
}

fn token(sub: &str, username: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        username: username.to_string(),
        role: "admin".to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .unwrap()
}

#[tokio::test]
async fn given_auth_disabled_when_no_headers_then_local_operator() {
    let state = idle_state(None);

    let caller = resolve_caller(&HeaderMap::new(), &state).unwrap();

    assert_eq!(caller.user_id, "local");
    assert_eq!(caller.username, "local");
    assert_eq!(caller.role, "operator");
}

#[tokio::test]
async fn given_auth_disabled_when_identity_headers_then_they_are_used() {
    let state = idle_state(None);

    let caller = resolve_caller(
        &headers(&[("x-user-id", "u-17"), ("x-username", "alice")]),
        &state,
    )
    .unwrap();

    assert_eq!(caller.user_id, "u-17");
    assert_eq!(caller.username, "alice");
}

#[tokio::test]
async fn given_auth_enabled_when_bearer_token_valid_then_claims_identity() {
    let state = idle_state(Some(Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET))));
    let bearer = format!("Bearer {}", token("u-1", "alice"));

    let caller = resolve_caller(&headers(&[("authorization", bearer.as_str())]), &state).unwrap();

    assert_eq!(caller.user_id, "u-1");
    assert_eq!(caller.username, "alice");
    assert_eq!(caller.role, "admin");
}

#[tokio::test]
async fn given_auth_enabled_when_identity_headers_only_then_unauthorized() {
    let state = idle_state(Some(Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET))));

    let error = resolve_caller(&headers(&[("x-user-id", "mallory")]), &state).unwrap_err();

    assert_eq!(error.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_auth_enabled_when_scheme_is_not_bearer_then_unauthorized() {
    let state = idle_state(Some(Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET))));

    let result = resolve_caller(&headers(&[("authorization", "Basic YWxpY2U6cHc=")]), &state);

    assert!(result.is_err());
}
