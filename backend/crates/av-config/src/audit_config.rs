use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Queue capacity constraints
pub const MIN_QUEUE_CAPACITY: usize = 1;
pub const MAX_QUEUE_CAPACITY: usize = 100_000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

pub const DEFAULT_BATCH_SIZE: usize = 100;

// Flush interval constraints (milliseconds)
pub const MIN_FLUSH_INTERVAL_MS: u64 = 10;
pub const MAX_FLUSH_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 2000;

pub const MAX_SHUTDOWN_GRACE_MS: u64 = 30_000;
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 100;

/// Command audit sink settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Entries buffered before new ones are dropped
    pub queue_capacity: usize,
    /// Entries per persistence call
    pub batch_size: usize,
    pub flush_interval_ms: u64,
    /// Time allowed for the final flush on shutdown
    pub shutdown_grace_ms: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.queue_capacity < MIN_QUEUE_CAPACITY || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::audit(format!(
                "audit.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.batch_size == 0 || self.batch_size > self.queue_capacity {
            return Err(ConfigError::audit(format!(
                "audit.batch_size must be 1-{} (queue_capacity), got {}",
                self.queue_capacity, self.batch_size
            )));
        }

        if self.flush_interval_ms < MIN_FLUSH_INTERVAL_MS
            || self.flush_interval_ms > MAX_FLUSH_INTERVAL_MS
        {
            return Err(ConfigError::audit(format!(
                "audit.flush_interval_ms must be {}-{}, got {}",
                MIN_FLUSH_INTERVAL_MS, MAX_FLUSH_INTERVAL_MS, self.flush_interval_ms
            )));
        }

        if self.shutdown_grace_ms > MAX_SHUTDOWN_GRACE_MS {
            return Err(ConfigError::audit(format!(
                "audit.shutdown_grace_ms must be at most {}, got {}",
                MAX_SHUTDOWN_GRACE_MS, self.shutdown_grace_ms
            )));
        }

        Ok(())
    }
}
