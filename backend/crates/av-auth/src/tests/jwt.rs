use crate::{AuthError, Claims, JwtValidator};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

fn create_test_token(claims: &Claims, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

fn valid_claims() -> Claims {
    Claims {
        sub: "user-123".to_string(),
        username: "alice".to_string(),
        role: "operator".to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: chrono::Utc::now().timestamp(),
    }
}

#[test]
fn given_valid_token_when_validated_then_returns_identity() {
    let validator = JwtValidator::with_hs256(SECRET);
    let token = create_test_token(&valid_claims(), SECRET);

    let claims = validator.validate(&token).unwrap();
    let identity = claims.identity();

    assert_eq!(identity.user_id, "user-123");
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.role, "operator");
}

#[test]
fn given_expired_token_when_validated_then_token_expired() {
    let validator = JwtValidator::with_hs256(SECRET);
    let mut claims = valid_claims();
    claims.exp = chrono::Utc::now().timestamp() - 3600;
    let token = create_test_token(&claims, SECRET);

    let result = validator.validate(&token);

    assert!(matches!(result, Err(AuthError::TokenExpired { .. })));
}

#[test]
fn given_wrong_secret_when_validated_then_decode_error() {
    let validator = JwtValidator::with_hs256(b"another-secret-key-at-least-32-bytes");
    let token = create_test_token(&valid_claims(), SECRET);

    let result = validator.validate(&token);

    assert!(matches!(result, Err(AuthError::JwtDecode { .. })));
}

#[test]
fn given_empty_username_when_validated_then_invalid_claim() {
    let validator = JwtValidator::with_hs256(SECRET);
    let mut claims = valid_claims();
    claims.username = String::new();
    let token = create_test_token(&claims, SECRET);

    let result = validator.validate(&token);

    match result {
        Err(AuthError::InvalidClaim { claim, .. }) => assert_eq!(claim, "username"),
        other => panic!("expected InvalidClaim, got {other:?}"),
    }
}

#[test]
fn given_empty_token_when_validated_then_missing_token() {
    let validator = JwtValidator::with_hs256(SECRET);

    let result = validator.validate("");

    assert!(matches!(result, Err(AuthError::MissingToken { .. })));
}
