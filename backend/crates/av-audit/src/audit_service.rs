use crate::flush_worker::FlushWorker;
use crate::audit_state::StateCell;
use crate::{AuditLogger, AuditServiceConfig, AuditState, AuditStats, AuditStatsSnapshot};

use std::sync::Arc;
use std::time::Duration;

use av_core::{AuditStore, CommandLogEntry};
use log::{info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};

/// Extra time granted to the worker past its own drain deadline
const WORKER_EXIT_SLACK: Duration = Duration::from_millis(10);

/// What happened to queued entries while shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutdownReport {
    /// Entries written by the store from the moment shutdown began
    pub flushed: u64,
    /// Entries discarded or lost to a failed final flush
    pub dropped: u64,
}

struct RunningWorker {
    handle: JoinHandle<()>,
    stop: oneshot::Sender<Instant>,
}

/// Asynchronous, batched audit sink.
///
/// Producers enqueue through [`AuditService::log_command`] (or a cloned
/// [`AuditLogger`]) without ever blocking. A single background worker
/// flushes a batch when it reaches the configured size or when the flush
/// interval elapses, whichever comes first. Persistence failures are
/// logged and the batch is not retried.
pub struct AuditService {
    config: AuditServiceConfig,
    store: Arc<dyn AuditStore>,
    logger: AuditLogger,
    stats: Arc<AuditStats>,
    state: Arc<StateCell>,
    receiver: Option<mpsc::Receiver<CommandLogEntry>>,
    worker: Option<RunningWorker>,
}

impl AuditService {
    /// Create a stopped sink. Entries logged before [`start`](Self::start)
    /// wait in the queue.
    pub fn new(config: AuditServiceConfig, store: Arc<dyn AuditStore>) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let stats = Arc::new(AuditStats::default());

        Self {
            logger: AuditLogger::new(sender, stats.clone()),
            config,
            store,
            stats,
            state: Arc::new(StateCell::new(AuditState::Stopped)),
            receiver: Some(receiver),
            worker: None,
        }
    }

    /// Spawn the flush worker. Only the first call has an effect.
    pub fn start(&mut self) {
        let Some(receiver) = self.receiver.take() else {
            warn!("Audit service already started");
            return;
        };

        let worker = FlushWorker {
            receiver,
            store: self.store.clone(),
            stats: self.stats.clone(),
            batch_size: self.config.batch_size.max(1),
            flush_interval: self.config.flush_interval,
            shutdown_grace: self.config.shutdown_grace,
        };
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(worker.run(stop_rx));

        self.worker = Some(RunningWorker { handle, stop });
        self.state.set(AuditState::Running);

        info!(
            "Audit service started (queue {}, batch {}, flush every {:?})",
            self.config.queue_capacity, self.config.batch_size, self.config.flush_interval
        );
    }

    pub fn log_command(&self, entry: CommandLogEntry) {
        self.logger.log_command(entry);
    }

    /// Producer handle for request handlers
    pub fn logger(&self) -> AuditLogger {
        self.logger.clone()
    }

    pub fn state(&self) -> AuditState {
        self.state.get()
    }

    pub fn stats(&self) -> AuditStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop accepting entries, give the worker `shutdown_grace` for a final
    /// flush, then discard whatever is left. Every accepted entry ends up
    /// either flushed or counted as dropped.
    pub async fn shutdown(mut self) -> ShutdownReport {
        let before = self.stats.snapshot();
        self.state.set(AuditState::Draining);

        if let Some(RunningWorker { mut handle, stop }) = self.worker.take() {
            let deadline = Instant::now() + self.config.shutdown_grace;
            let _ = stop.send(deadline);

            if timeout_at(deadline + WORKER_EXIT_SLACK, &mut handle).await.is_err() {
                warn!("Audit flush worker overran its shutdown budget, aborting");
                handle.abort();
                let _ = handle.await;
            }
        }

        if let Some(mut receiver) = self.receiver.take() {
            receiver.close();
            let mut discarded = 0u64;
            while receiver.try_recv().is_ok() {
                discarded += 1;
            }
            if discarded > 0 {
                warn!("Audit service never started, discarding {discarded} entries");
                self.stats.record_discarded(discarded);
            }
        }

        let unaccounted = self.stats.snapshot().outstanding();
        if unaccounted > 0 {
            self.stats.record_discarded(unaccounted);
        }

        self.state.set(AuditState::Stopped);

        let after = self.stats.snapshot();
        let report = ShutdownReport {
            flushed: after.persisted - before.persisted,
            dropped: (after.failed - before.failed) + (after.discarded - before.discarded),
        };
        info!(
            "Audit service stopped ({} flushed, {} dropped)",
            report.flushed, report.dropped
        );
        report
    }
}
