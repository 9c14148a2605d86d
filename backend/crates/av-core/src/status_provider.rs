use crate::Result as CoreErrorResult;

use async_trait::async_trait;

/// Point-in-time device status. Forwarded to viewers without interpretation.
pub type StatusSnapshot = serde_json::Value;

/// Source of device status snapshots (the hardware driver)
#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn snapshot(&self) -> CoreErrorResult<StatusSnapshot>;
}
