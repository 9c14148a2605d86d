#![allow(dead_code)]

//! Test infrastructure for av-server API tests

use av_audit::{AuditService, AuditServiceConfig};
use av_auth::{Claims, JwtValidator};
use av_core::CommandLog;
use av_db::{CommandLogRepository, SqliteAuditStore};
use av_server::{MockDevice, ServerState, build_router};
use av_ws::{AppState, ConnectionConfig, Hub, HubHandle, Metrics};

use std::sync::Arc;
use std::time::Duration;

use axum_test::{TestServer, TestWebSocket};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

pub struct TestApp {
    pub server: TestServer,
    pub hub: HubHandle,
    pub audit: AuditService,
    pub pool: SqlitePool,
    _dir: TempDir,
}

/// Server with authentication disabled
pub async fn create_test_app() -> TestApp {
    create_app(None).await
}

pub async fn create_authenticated_test_app() -> TestApp {
    create_app(Some(Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)))).await
}

async fn create_app(jwt_validator: Option<Arc<JwtValidator>>) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = av_db::connect(&dir.path().join("audit.db"))
        .await
        .expect("Failed to open test database");

    let config = ConnectionConfig::default();
    let metrics = Metrics::default();
    let (hub, handle) = Hub::new(config.mailbox_capacity, metrics.clone());
    tokio::spawn(hub.run());

    let mut audit = AuditService::new(
        AuditServiceConfig {
            flush_interval: Duration::from_millis(20),
            ..AuditServiceConfig::default()
        },
        Arc::new(SqliteAuditStore::new(pool.clone())),
    );
    audit.start();

    let device = Arc::new(MockDevice::new());
    let state = ServerState {
        ws: AppState {
            hub: handle.clone(),
            jwt_validator,
            config,
            metrics,
        },
        audit: audit.logger(),
        device: device.clone(),
        status: device,
        pool: pool.clone(),
    };

    let server = TestServer::builder()
        .http_transport()
        .build(build_router(state))
        .expect("Failed to create test server");

    TestApp {
        server,
        hub: handle,
        audit,
        pool,
        _dir: dir,
    }
}

/// Wait until the audit worker has written `expected` rows
pub async fn wait_for_logs(pool: &SqlitePool, expected: i64) -> Vec<CommandLog> {
    for _ in 0..200 {
        if CommandLogRepository::count(pool).await.unwrap() >= expected {
            return CommandLogRepository::recent(pool, 100).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {expected} audit rows");
}

pub async fn connect_viewer(server: &TestServer, user_id: &str) -> TestWebSocket {
    server
        .get_websocket("/ws")
        .add_query_param("user_id", user_id)
        .await
        .into_websocket()
        .await
}

pub async fn receive_event(ws: &mut TestWebSocket) -> Value {
    serde_json::from_str(&ws.receive_text().await).expect("event is JSON")
}

pub fn create_test_token(sub: &str, username: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        username: username.to_string(),
        role: "operator".to_string(),
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("Failed to encode JWT")
}
