use crate::{ConnectionConfig, ConnectionId, HubHandle, Metrics, Result as WsErrorResult, WsError};

use av_core::Identity;

use std::fmt::Display;
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, info, warn};
use tokio::sync::{Notify, mpsc};
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout, timeout_at};

/// One connected viewer and the two pumps moving its frames.
///
/// The outbound pump drains the mailbox and keeps the connection alive with
/// pings; the inbound pump enforces the read deadline and size limit.
/// Either pump exiting unregisters the client. The hub only ever drops the
/// client once, so both pumps may report the same connection.
pub struct Client {
    id: ConnectionId,
    identity: Identity,
    hub: HubHandle,
    config: ConnectionConfig,
    metrics: Metrics,
}

impl Client {
    pub fn new(
        id: ConnectionId,
        identity: Identity,
        hub: HubHandle,
        config: ConnectionConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            id,
            identity,
            hub,
            config,
            metrics,
        }
    }

    /// Drive both pumps until the connection ends.
    pub async fn run<S, R, E>(self, mailbox: mpsc::Receiver<Utf8Bytes>, sink: S, stream: R)
    where
        S: Sink<Message> + Unpin + Send + 'static,
        S::Error: Display + Send,
        R: Stream<Item = Result<Message, E>> + Unpin + Send,
        E: Display + Send,
    {
        info!("Connection {} opened for {}", self.id, self.identity);
        self.metrics.connection_established();

        let wake = Arc::new(Notify::new());

        let writer = tokio::spawn(write_pump(
            self.id,
            mailbox,
            sink,
            self.config.clone(),
            self.hub.clone(),
            self.metrics.clone(),
            wake.clone(),
        ));

        let read_result = read_pump(self.id, stream, &self.config, wake).await;
        self.hub.unregister(self.id).await;

        let write_result = match writer.await {
            Ok(result) => result,
            Err(e) => Err(WsError::connection_closed(format!("write pump failed: {e}"))),
        };

        let reason = match (&read_result, &write_result) {
            (Err(e), _) | (Ok(()), Err(e)) => {
                warn!("Connection {} for {} ended: {e}", self.id, self.identity);
                e.kind()
            }
            (Ok(()), Ok(())) => "normal",
        };
        self.metrics.connection_closed(reason);
        info!("Connection {} closed for {}", self.id, self.identity);
    }
}

/// Outbound pump. Returns `Ok` when the hub closed the mailbox.
pub(crate) async fn write_pump<S>(
    id: ConnectionId,
    mut mailbox: mpsc::Receiver<Utf8Bytes>,
    mut sink: S,
    config: ConnectionConfig,
    hub: HubHandle,
    metrics: Metrics,
    wake: Arc<Notify>,
) -> WsErrorResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut ticker = interval_at(Instant::now() + config.ping_interval, config.ping_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let result = loop {
        tokio::select! {
            received = mailbox.recv() => match received {
                Some(first) => {
                    let mut batch = vec![first];
                    while let Ok(next) = mailbox.try_recv() {
                        batch.push(next);
                    }
                    let count = batch.len();
                    if let Err(e) = write_batch(&mut sink, batch, &config).await {
                        break Err(e);
                    }
                    metrics.messages_sent(count);
                }
                None => {
                    debug!("Mailbox for {id} closed, sending close frame");
                    let _ = timeout(config.write_timeout, sink.send(Message::Close(None))).await;
                    break Ok(());
                }
            },
            _ = ticker.tick() => {
                if let Err(e) = write_with_deadline(&mut sink, Message::Ping(Bytes::new()), &config).await {
                    break Err(e);
                }
            }
        }
    };

    hub.unregister(id).await;
    wake.notify_one();
    result
}

/// Feed every payload as its own text frame, then flush once.
async fn write_batch<S>(
    sink: &mut S,
    batch: Vec<Utf8Bytes>,
    config: &ConnectionConfig,
) -> WsErrorResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let write = async {
        for payload in batch {
            sink.feed(Message::Text(payload)).await?;
        }
        sink.flush().await
    };

    match timeout(config.write_timeout, write).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WsError::transport(e)),
        Err(_) => Err(write_timeout_error(config)),
    }
}

async fn write_with_deadline<S>(
    sink: &mut S,
    message: Message,
    config: &ConnectionConfig,
) -> WsErrorResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match timeout(config.write_timeout, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WsError::transport(e)),
        Err(_) => Err(write_timeout_error(config)),
    }
}

#[track_caller]
fn write_timeout_error(config: &ConnectionConfig) -> WsError {
    WsError::WriteTimeout {
        timeout_secs: config.write_timeout.as_secs(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Inbound pump. Viewer messages carry no meaning and are only logged.
pub(crate) async fn read_pump<R, E>(
    id: ConnectionId,
    mut stream: R,
    config: &ConnectionConfig,
    wake: Arc<Notify>,
) -> WsErrorResult<()>
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut deadline = Instant::now() + config.pong_timeout;

    loop {
        tokio::select! {
            _ = wake.notified() => {
                debug!("Outbound pump for {id} ended, releasing reader");
                return Ok(());
            }
            next = timeout_at(deadline, stream.next()) => match next {
                Err(_) => {
                    return Err(WsError::HeartbeatTimeout {
                        timeout_secs: config.pong_timeout.as_secs(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Ok(None) => {
                    debug!("Connection {id} stream ended");
                    return Ok(());
                }
                Ok(Some(Err(e))) => return Err(WsError::transport(e)),
                Ok(Some(Ok(message))) => match message {
                    Message::Pong(_) => deadline = Instant::now() + config.pong_timeout,
                    Message::Close(_) => {
                        debug!("Connection {id} closed by viewer");
                        return Ok(());
                    }
                    Message::Text(text) => {
                        check_size(text.len(), config)?;
                        debug!("Connection {id} sent: {}", text.as_str());
                    }
                    Message::Binary(data) => {
                        check_size(data.len(), config)?;
                        debug!("Connection {id} sent {} binary bytes", data.len());
                    }
                    Message::Ping(_) => {}
                },
            }
        }
    }
}

#[track_caller]
fn check_size(size: usize, config: &ConnectionConfig) -> WsErrorResult<()> {
    if size > config.max_message_size {
        return Err(WsError::MessageTooLarge {
            size,
            max: config.max_message_size,
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}
