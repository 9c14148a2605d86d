use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Transport error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Write did not complete within {timeout_secs}s {location}")]
    WriteTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Message of {size} bytes exceeds limit of {max} {location}")]
    MessageTooLarge {
        size: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Hub is not running {location}")]
    HubStopped { location: ErrorLocation },
}

impl WsError {
    #[track_caller]
    pub fn connection_closed<S: Into<String>>(reason: S) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn transport<E: std::fmt::Display>(error: E) -> Self {
        Self::Transport {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn hub_stopped() -> Self {
        Self::HubStopped {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short label for metrics and close reasons
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "closed",
            Self::Serialization { .. } => "serialization",
            Self::Transport { .. } => "transport",
            Self::WriteTimeout { .. } => "write_timeout",
            Self::HeartbeatTimeout { .. } => "heartbeat_timeout",
            Self::MessageTooLarge { .. } => "message_too_large",
            Self::HubStopped { .. } => "hub_stopped",
        }
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
