use crate::Result as WsErrorResult;

use av_core::{Identity, StatusSnapshot};

use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event kinds pushed to viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CommandExecuted,
    StatusUpdate,
    UserConnected,
    UserDisconnected,
}

/// Envelope sent as one text frame: `{type, timestamp, data}`.
///
/// The hub treats the encoded form as an opaque blob and never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Serialized as RFC3339
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandExecutedData {
    pub user_id: String,
    pub username: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdateData {
    pub status: StatusSnapshot,
}

/// Payload of both `user_connected` and `user_disconnected`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPresenceData {
    pub user_id: String,
    pub username: String,
}

impl BroadcastMessage {
    pub fn new<T: Serialize>(event_type: EventType, data: &T) -> WsErrorResult<Self> {
        Ok(Self {
            event_type,
            timestamp: Utc::now(),
            data: serde_json::to_value(data)?,
        })
    }

    pub fn command_executed(
        user_id: impl Into<String>,
        username: impl Into<String>,
        command: impl Into<String>,
        payload: Option<Value>,
    ) -> WsErrorResult<Self> {
        Self::new(
            EventType::CommandExecuted,
            &CommandExecutedData {
                user_id: user_id.into(),
                username: username.into(),
                command: command.into(),
                payload,
            },
        )
    }

    pub fn status_update(status: StatusSnapshot) -> WsErrorResult<Self> {
        Self::new(EventType::StatusUpdate, &StatusUpdateData { status })
    }

    pub fn user_connected(identity: &Identity) -> WsErrorResult<Self> {
        Self::presence(EventType::UserConnected, identity)
    }

    pub fn user_disconnected(identity: &Identity) -> WsErrorResult<Self> {
        Self::presence(EventType::UserDisconnected, identity)
    }

    fn presence(event_type: EventType, identity: &Identity) -> WsErrorResult<Self> {
        Self::new(
            event_type,
            &UserPresenceData {
                user_id: identity.user_id.clone(),
                username: identity.username.clone(),
            },
        )
    }

    /// Serialize into the text frame payload
    pub fn encode(&self) -> WsErrorResult<Utf8Bytes> {
        Ok(Utf8Bytes::from(serde_json::to_string(self)?))
    }
}
