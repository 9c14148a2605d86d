use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Mailbox capacity constraints
pub const MIN_MAILBOX_CAPACITY: usize = 1;
pub const MAX_MAILBOX_CAPACITY: usize = 10000;
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

// Ping interval constraints (seconds)
pub const MIN_PING_INTERVAL_SECS: u64 = 1;
pub const MAX_PING_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 54;

// Pong timeout constraints (seconds)
pub const MAX_PONG_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_PONG_TIMEOUT_SECS: u64 = 60;

// Write timeout constraints (seconds)
pub const MIN_WRITE_TIMEOUT_SECS: u64 = 1;
pub const MAX_WRITE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

// Inbound message size constraints (bytes)
pub const MIN_MAX_MESSAGE_SIZE: usize = 64;
pub const MAX_MAX_MESSAGE_SIZE: usize = 1024 * 1024;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;

/// Live viewer connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound mailbox capacity per client
    pub mailbox_capacity: usize,
    /// Keepalive ping interval in seconds
    pub ping_interval_secs: u64,
    /// Time allowed between pongs before the connection is dropped
    pub pong_timeout_secs: u64,
    /// Deadline for a single write or flush
    pub write_timeout_secs: u64,
    /// Largest accepted inbound message in bytes
    pub max_message_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            pong_timeout_secs: DEFAULT_PONG_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.mailbox_capacity < MIN_MAILBOX_CAPACITY
            || self.mailbox_capacity > MAX_MAILBOX_CAPACITY
        {
            return Err(ConfigError::websocket(format!(
                "websocket.mailbox_capacity must be {}-{}, got {}",
                MIN_MAILBOX_CAPACITY, MAX_MAILBOX_CAPACITY, self.mailbox_capacity
            )));
        }

        if self.ping_interval_secs < MIN_PING_INTERVAL_SECS
            || self.ping_interval_secs > MAX_PING_INTERVAL_SECS
        {
            return Err(ConfigError::websocket(format!(
                "websocket.ping_interval_secs must be {}-{}, got {}",
                MIN_PING_INTERVAL_SECS, MAX_PING_INTERVAL_SECS, self.ping_interval_secs
            )));
        }

        if self.pong_timeout_secs > MAX_PONG_TIMEOUT_SECS {
            return Err(ConfigError::websocket(format!(
                "websocket.pong_timeout_secs must be at most {}, got {}",
                MAX_PONG_TIMEOUT_SECS, self.pong_timeout_secs
            )));
        }

        // A pong can only arrive after a ping went out.
        if self.pong_timeout_secs <= self.ping_interval_secs {
            return Err(ConfigError::websocket(format!(
                "websocket.pong_timeout_secs ({}) must be greater than ping_interval_secs ({})",
                self.pong_timeout_secs, self.ping_interval_secs
            )));
        }

        if self.write_timeout_secs < MIN_WRITE_TIMEOUT_SECS
            || self.write_timeout_secs > MAX_WRITE_TIMEOUT_SECS
        {
            return Err(ConfigError::websocket(format!(
                "websocket.write_timeout_secs must be {}-{}, got {}",
                MIN_WRITE_TIMEOUT_SECS, MAX_WRITE_TIMEOUT_SECS, self.write_timeout_secs
            )));
        }

        if self.max_message_size < MIN_MAX_MESSAGE_SIZE
            || self.max_message_size > MAX_MAX_MESSAGE_SIZE
        {
            return Err(ConfigError::websocket(format!(
                "websocket.max_message_size must be {}-{}, got {}",
                MIN_MAX_MESSAGE_SIZE, MAX_MAX_MESSAGE_SIZE, self.max_message_size
            )));
        }

        Ok(())
    }
}
