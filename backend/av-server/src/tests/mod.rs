mod api;

use crate::{MockDevice, ServerState};

use av_audit::{AuditService, AuditServiceConfig};
use av_auth::JwtValidator;
use av_db::SqliteAuditStore;
use av_ws::{AppState, ConnectionConfig, Hub, Metrics};

use std::sync::Arc;

use sqlx::SqlitePool;

pub const TEST_JWT_SECRET: &[u8] = b"unit-test-secret-key-that-is-at-least-32-bytes";

/// State whose pool and hub are never driven; enough for request-level helpers
pub fn idle_state(jwt_validator: Option<Arc<JwtValidator>>) -> ServerState {
    let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
    let (_hub, handle) = Hub::new(8, Metrics::default());
    let audit = AuditService::new(
        AuditServiceConfig::default(),
        Arc::new(SqliteAuditStore::new(pool.clone())),
    );
    let device = Arc::new(MockDevice::new());

    ServerState {
        ws: AppState {
            hub: handle,
            jwt_validator,
            config: ConnectionConfig::default(),
            metrics: Metrics::default(),
        },
        audit: audit.logger(),
        device: device.clone(),
        status: device,
        pool,
    }
}
