mod status_poller;

use crate::{BroadcastMessage, EventType, Hub, HubHandle, Metrics};

use av_core::Identity;

use std::time::Duration;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc;

pub(crate) fn identity(name: &str) -> Identity {
    Identity::new(format!("{name}-id"), name, "operator")
}

pub(crate) fn start_hub(mailbox_capacity: usize) -> HubHandle {
    let (hub, handle) = Hub::new(mailbox_capacity, Metrics::default());
    tokio::spawn(hub.run());
    handle
}

/// Under paused time this returns only once every task is idle, so the hub
/// has applied everything sent to it.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub(crate) fn decode(payload: &Utf8Bytes) -> BroadcastMessage {
    serde_json::from_str(payload.as_str()).unwrap()
}

/// Everything currently queued in a mailbox
pub(crate) fn drain(mailbox: &mut mpsc::Receiver<Utf8Bytes>) -> Vec<BroadcastMessage> {
    let mut messages = Vec::new();
    while let Ok(payload) = mailbox.try_recv() {
        messages.push(decode(&payload));
    }
    messages
}

pub(crate) fn of_type(messages: &[BroadcastMessage], event_type: EventType) -> usize {
    messages
        .iter()
        .filter(|m| m.event_type == event_type)
        .count()
}
