#![allow(dead_code)]

use av_auth::{Claims, JwtValidator};
use av_ws::{AppState, ConnectionConfig, Hub, HubHandle, Metrics};

use std::sync::Arc;

use axum::{Router, routing::get};
use axum_test::{TestServer, TestWebSocket};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;

/// HS256 requires at least 32 bytes
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

pub struct TestServerWithHub {
    pub server: TestServer,
    pub hub: HubHandle,
}

/// Server with authentication disabled; identity comes from the query string
pub fn create_test_server() -> TestServerWithHub {
    create_server(None)
}

pub fn create_authenticated_test_server() -> TestServerWithHub {
    create_server(Some(Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET))))
}

fn create_server(jwt_validator: Option<Arc<JwtValidator>>) -> TestServerWithHub {
    let config = ConnectionConfig::default();
    let metrics = Metrics::default();
    let (hub, handle) = Hub::new(config.mailbox_capacity, metrics.clone());
    tokio::spawn(hub.run());

    let state = AppState {
        hub: handle.clone(),
        jwt_validator,
        config,
        metrics,
    };
    let router = Router::new()
        .route("/ws", get(av_ws::handler))
        .with_state(state);

    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .expect("Failed to create test server");

    TestServerWithHub {
        server,
        hub: handle,
    }
}

pub async fn connect_as(server: &TestServer, user_id: &str) -> TestWebSocket {
    server
        .get_websocket("/ws")
        .add_query_param("user_id", user_id)
        .add_query_param("username", user_id)
        .await
        .into_websocket()
        .await
}

pub async fn receive_event(ws: &mut TestWebSocket) -> Value {
    serde_json::from_str(&ws.receive_text().await).expect("event is JSON")
}

pub fn create_test_token(sub: &str, username: &str, expires_in_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        username: username.to_string(),
        role: "operator".to_string(),
        exp: now + expires_in_secs,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("Failed to encode JWT")
}
