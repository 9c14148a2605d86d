use crate::{CommandLog, Identity, is_remote_access};

use chrono::{DateTime, Utc};

/// One executed (or failed) device command, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLogEntry {
    pub user_id: String,
    pub username: String,
    pub command_type: String,
    /// Raw request body, empty when the command carried none
    pub command_payload: String,
    pub success: bool,
    pub error_message: String,
    pub execution_time_ms: i64,
    pub is_remote_access: bool,
    pub client_ip: String,
}

impl CommandLogEntry {
    /// Entry for a successful command. Remote access is derived from `client_ip`.
    pub fn success(
        identity: &Identity,
        command_type: impl Into<String>,
        command_payload: impl Into<String>,
        execution_time_ms: i64,
        client_ip: impl Into<String>,
    ) -> Self {
        let client_ip = client_ip.into();
        Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            command_type: command_type.into(),
            command_payload: command_payload.into(),
            success: true,
            error_message: String::new(),
            execution_time_ms,
            is_remote_access: is_remote_access(&client_ip),
            client_ip,
        }
    }

    /// Turn a successful entry into a failed one carrying `error_message`.
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = error_message.into();
        self
    }

    /// Convert into the persisted record, stamping the execution time.
    pub fn into_record(self, executed_at: DateTime<Utc>) -> CommandLog {
        CommandLog::from_entry(self, executed_at)
    }
}
