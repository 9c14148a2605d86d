use crate::{HubHandle, Metrics};

use av_core::StatusProvider;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Periodically pushes device status to every viewer.
///
/// The first poll happens one interval after [`StatusPoller::start`]. A
/// failed snapshot is logged and skipped; the next tick tries again.
pub struct StatusPoller {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl StatusPoller {
    pub fn start(
        provider: Arc<dyn StatusProvider>,
        hub: HubHandle,
        interval: Duration,
        metrics: Metrics,
    ) -> Self {
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(poll_loop(provider, hub, interval, metrics, stop_rx));
        info!("Status poller started (every {interval:?})");

        Self { stop, handle }
    }

    /// Stop polling. An in-flight device call is abandoned; no tick runs
    /// after this returns.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            warn!("Status poller task ended abnormally: {e}");
        }
        info!("Status poller stopped");
    }
}

async fn poll_loop(
    provider: Arc<dyn StatusProvider>,
    hub: HubHandle,
    interval: Duration,
    metrics: Metrics,
    mut stop: oneshot::Receiver<()>,
) {
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            _ = ticker.tick() => {}
        }

        // A hung device call must not hold off the stop signal
        tokio::select! {
            biased;
            _ = &mut stop => {
                debug!("Status poll abandoned on stop");
                break;
            }
            _ = poll_once(provider.as_ref(), &hub, &metrics) => {}
        }
    }

    debug!("Status poll loop exited");
}

async fn poll_once(provider: &dyn StatusProvider, hub: &HubHandle, metrics: &Metrics) {
    match provider.snapshot().await {
        Ok(status) => hub.broadcast_status_update(status).await,
        Err(e) => {
            warn!("Status poll failed: {e}");
            metrics.error_occurred("status_poll");
        }
    }
}
