use crate::CommandLogEntry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted audit record for one device command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLog {
    pub id: Uuid,

    pub user_id: String,
    pub username: String,

    pub command_type: String,
    pub command_payload: String,
    pub executed_at: DateTime<Utc>,

    pub success: bool,
    pub error_message: String,
    pub execution_time_ms: i64,

    pub is_remote_access: bool,
    pub client_ip: String,
}

impl CommandLog {
    pub fn from_entry(entry: CommandLogEntry, executed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            username: entry.username,
            command_type: entry.command_type,
            command_payload: entry.command_payload,
            executed_at,
            success: entry.success,
            error_message: entry.error_message,
            execution_time_ms: entry.execution_time_ms,
            is_remote_access: entry.is_remote_access,
            client_ip: entry.client_ip,
        }
    }
}
