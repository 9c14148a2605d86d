use crate::{BroadcastMessage, ConnectionId, Metrics, Result as WsErrorResult, WsError};

use av_core::{Identity, StatusSnapshot};

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::ws::Utf8Bytes;
use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

/// Capacity of each control channel feeding the hub loop
const CONTROL_CHANNEL_CAPACITY: usize = 256;

/// A live client as seen by the hub. Dropping the entry closes the mailbox.
struct ClientEntry {
    identity: Identity,
    mailbox: mpsc::Sender<Utf8Bytes>,
}

struct RegisterRequest {
    id: ConnectionId,
    identity: Identity,
    mailbox: mpsc::Sender<Utf8Bytes>,
    ack: oneshot::Sender<()>,
}

/// What a newly registered client needs to run its pumps
pub struct Registration {
    pub id: ConnectionId,
    pub identity: Identity,
    /// Outbound queue; yields `None` once the hub has dropped the client
    pub mailbox: mpsc::Receiver<Utf8Bytes>,
}

/// Owner of the live-client set.
///
/// Exactly one task runs [`Hub::run`]; every mutation of the set happens
/// there. Everything else talks to it through a [`HubHandle`].
pub struct Hub {
    clients: HashMap<ConnectionId, ClientEntry>,
    register_rx: mpsc::Receiver<RegisterRequest>,
    unregister_rx: mpsc::Receiver<ConnectionId>,
    broadcast_rx: mpsc::Receiver<Utf8Bytes>,
    close_rx: mpsc::Receiver<()>,
    client_count: Arc<AtomicUsize>,
    metrics: Metrics,
}

/// Cloneable front door to the hub loop
#[derive(Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<RegisterRequest>,
    unregister_tx: mpsc::Sender<ConnectionId>,
    broadcast_tx: mpsc::Sender<Utf8Bytes>,
    close_tx: mpsc::Sender<()>,
    client_count: Arc<AtomicUsize>,
    mailbox_capacity: usize,
}

impl Hub {
    pub fn new(mailbox_capacity: usize, metrics: Metrics) -> (Self, HubHandle) {
        let (register_tx, register_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let (unregister_tx, unregister_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let (close_tx, close_rx) = mpsc::channel(1);
        let client_count = Arc::new(AtomicUsize::new(0));

        let hub = Self {
            clients: HashMap::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            close_rx,
            client_count: client_count.clone(),
            metrics,
        };
        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            close_tx,
            client_count,
            mailbox_capacity: mailbox_capacity.max(1),
        };

        (hub, handle)
    }

    /// Run the control loop until [`HubHandle::close`] is called or every
    /// handle is gone.
    pub async fn run(mut self) {
        info!("Hub started");

        loop {
            tokio::select! {
                Some(request) = self.register_rx.recv() => self.register(request),
                Some(id) = self.unregister_rx.recv() => self.unregister(id),
                Some(payload) = self.broadcast_rx.recv() => self.fan_out(payload),
                _ = self.close_rx.recv() => break,
                else => break,
            }
        }

        let remaining = self.clients.len();
        self.clients.clear();
        self.publish_count();
        info!("Hub stopped, released {remaining} clients");
    }

    fn register(&mut self, request: RegisterRequest) {
        let RegisterRequest {
            id,
            identity,
            mailbox,
            ack,
        } = request;

        self.clients.insert(
            id,
            ClientEntry {
                identity: identity.clone(),
                mailbox,
            },
        );

        if ack.send(()).is_err() {
            debug!("Registrant for {id} went away before the ack");
            self.clients.remove(&id);
            return;
        }

        self.publish_count();
        info!(
            "Client {id} registered for {identity} ({} connected)",
            self.clients.len()
        );

        if let Some(payload) = presence_payload(BroadcastMessage::user_connected(&identity)) {
            self.fan_out(payload);
        }
    }

    fn unregister(&mut self, id: ConnectionId) {
        match self.clients.remove(&id) {
            Some(entry) => {
                self.publish_count();
                info!(
                    "Client {id} unregistered for {} ({} connected)",
                    entry.identity,
                    self.clients.len()
                );
                if let Some(payload) =
                    presence_payload(BroadcastMessage::user_disconnected(&entry.identity))
                {
                    self.fan_out(payload);
                }
            }
            None => debug!("Client {id} already unregistered"),
        }
    }

    /// Non-blocking delivery to every mailbox. Clients whose mailbox is full
    /// or closed are evicted, and their departure is announced in turn.
    fn fan_out(&mut self, payload: Utf8Bytes) {
        let mut pending = VecDeque::from([payload]);

        while let Some(payload) = pending.pop_front() {
            let mut evicted = Vec::new();
            let mut delivered = 0;

            for (id, entry) in &self.clients {
                match entry.mailbox.try_send(payload.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        warn!("Client {id} ({}) too slow, disconnecting", entry.identity);
                        self.metrics.client_evicted("mailbox_full");
                        evicted.push(*id);
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!("Client {id} mailbox closed, removing");
                        self.metrics.client_evicted("mailbox_closed");
                        evicted.push(*id);
                    }
                }
            }
            self.metrics.broadcast_published(delivered);

            for id in evicted {
                let Some(entry) = self.clients.remove(&id) else {
                    continue;
                };
                if let Some(payload) =
                    presence_payload(BroadcastMessage::user_disconnected(&entry.identity))
                {
                    pending.push_back(payload);
                }
            }
            self.publish_count();
        }
    }

    fn publish_count(&self) {
        self.client_count.store(self.clients.len(), Ordering::Release);
        self.metrics.clients_active(self.clients.len());
    }
}

fn presence_payload(message: WsErrorResult<BroadcastMessage>) -> Option<Utf8Bytes> {
    match message.and_then(|message| message.encode()) {
        Ok(payload) => Some(payload),
        Err(e) => {
            error!("Dropping presence event: {e}");
            None
        }
    }
}

impl HubHandle {
    /// Add a client to the live set. Resolves once the hub loop has applied
    /// the registration and queued the `user_connected` event.
    pub async fn register(&self, identity: Identity) -> WsErrorResult<Registration> {
        let id = ConnectionId::new();
        let (mailbox_tx, mailbox) = mpsc::channel(self.mailbox_capacity);
        let (ack, acked) = oneshot::channel();

        self.register_tx
            .send(RegisterRequest {
                id,
                identity: identity.clone(),
                mailbox: mailbox_tx,
                ack,
            })
            .await
            .map_err(|_| WsError::hub_stopped())?;
        acked.await.map_err(|_| WsError::hub_stopped())?;

        Ok(Registration {
            id,
            identity,
            mailbox,
        })
    }

    /// Remove a client. Unknown or already removed ids are ignored.
    pub async fn unregister(&self, id: ConnectionId) {
        if self.unregister_tx.send(id).await.is_err() {
            debug!("Hub stopped before unregistering {id}");
        }
    }

    /// Encode and hand an envelope to the hub loop. Encoding failures are
    /// logged and the event is dropped.
    pub async fn broadcast(&self, message: &BroadcastMessage) {
        match message.encode() {
            Ok(payload) => self.broadcast_raw(payload).await,
            Err(e) => error!("Dropping {:?} broadcast: {e}", message.event_type),
        }
    }

    /// Hand a `command_executed` event to the hub loop without waiting.
    /// Returns `false` when the event was dropped because the hub is
    /// backed up or gone.
    pub fn broadcast_command_executed(
        &self,
        user_id: &str,
        username: &str,
        command: &str,
        payload: Option<Value>,
    ) -> bool {
        let encoded = BroadcastMessage::command_executed(user_id, username, command, payload)
            .and_then(|message| message.encode());
        let payload = match encoded {
            Ok(payload) => payload,
            Err(e) => {
                error!("Dropping command_executed broadcast for {command}: {e}");
                return false;
            }
        };

        match self.broadcast_tx.try_send(payload) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Hub backed up, dropping command_executed broadcast for {command}");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Hub stopped, command_executed broadcast for {command} discarded");
                false
            }
        }
    }

    pub async fn broadcast_status_update(&self, status: StatusSnapshot) {
        match BroadcastMessage::status_update(status) {
            Ok(message) => self.broadcast(&message).await,
            Err(e) => error!("Dropping status_update broadcast: {e}"),
        }
    }

    async fn broadcast_raw(&self, payload: Utf8Bytes) {
        if self.broadcast_tx.send(payload).await.is_err() {
            debug!("Hub stopped, broadcast discarded");
        }
    }

    /// Live-set size as last published by the hub loop
    pub fn client_count(&self) -> usize {
        self.client_count.load(Ordering::Acquire)
    }

    /// Ask the hub loop to exit, closing every mailbox
    pub fn close(&self) {
        let _ = self.close_tx.try_send(());
    }
}
