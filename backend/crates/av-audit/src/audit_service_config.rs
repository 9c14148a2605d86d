use std::time::Duration;

use av_config::AuditConfig;

/// Runtime settings for the audit sink
#[derive(Debug, Clone)]
pub struct AuditServiceConfig {
    /// Entries buffered before new ones are dropped
    pub queue_capacity: usize,
    /// Batch size that triggers an immediate flush
    pub batch_size: usize,
    /// Flush cadence for partial batches
    pub flush_interval: Duration,
    /// Budget for the final flush during shutdown
    pub shutdown_grace: Duration,
}

impl Default for AuditServiceConfig {
    fn default() -> Self {
        Self::from(&AuditConfig::default())
    }
}

impl From<&AuditConfig> for AuditServiceConfig {
    fn from(config: &AuditConfig) -> Self {
        Self {
            queue_capacity: config.queue_capacity,
            batch_size: config.batch_size,
            flush_interval: Duration::from_millis(config.flush_interval_ms),
            shutdown_grace: Duration::from_millis(config.shutdown_grace_ms),
        }
    }
}
