pub mod app_state;
pub mod broadcast_message;
pub mod client;
pub mod connection_config;
pub mod connection_id;
pub mod error;
pub mod hub;
pub mod metrics;
pub mod status_poller;

pub use app_state::{AppState, ConnectParams, handler};
pub use broadcast_message::{
    BroadcastMessage, CommandExecutedData, EventType, StatusUpdateData, UserPresenceData,
};
pub use client::Client;
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use error::{Result, WsError};
pub use hub::{Hub, HubHandle, Registration};
pub use metrics::Metrics;
pub use status_poller::StatusPoller;

#[cfg(test)]
mod tests;
