use std::time::Duration;

use av_config::WebSocketConfig;

/// Per-connection limits and heartbeat timing
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound mailbox capacity; a full mailbox gets the client evicted
    pub mailbox_capacity: usize,
    pub ping_interval: Duration,
    /// Read deadline, pushed forward on every pong
    pub pong_timeout: Duration,
    /// Deadline for one write batch including its flush
    pub write_timeout: Duration,
    pub max_message_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from(&WebSocketConfig::default())
    }
}

impl From<&WebSocketConfig> for ConnectionConfig {
    fn from(config: &WebSocketConfig) -> Self {
        Self {
            mailbox_capacity: config.mailbox_capacity,
            ping_interval: Duration::from_secs(config.ping_interval_secs),
            pong_timeout: Duration::from_secs(config.pong_timeout_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            max_message_size: config.max_message_size,
        }
    }
}
