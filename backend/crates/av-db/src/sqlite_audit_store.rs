use crate::CommandLogRepository;

use av_core::{AuditStore, CommandLog, CoreError, Result as CoreErrorResult};

use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;

/// `AuditStore` backed by the `command_logs` table
#[derive(Clone)]
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

impl SqliteAuditStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    async fn persist_batch(&self, records: &[CommandLog]) -> CoreErrorResult<()> {
        let written = CommandLogRepository::insert_batch(&self.pool, records)
            .await
            .map_err(|e| CoreError::storage(e.to_string()))?;

        debug!("Persisted {written} command log rows");
        Ok(())
    }
}
