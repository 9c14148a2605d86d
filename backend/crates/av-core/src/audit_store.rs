use crate::{CommandLog, Result as CoreErrorResult};

use async_trait::async_trait;

/// Durable sink for command audit records.
///
/// A call covers one whole batch. Implementations decide whether a failure
/// is partial; callers treat any error as "batch lost".
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn persist_batch(&self, records: &[CommandLog]) -> CoreErrorResult<()>;
}
