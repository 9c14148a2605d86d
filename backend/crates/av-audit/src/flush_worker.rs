use crate::AuditStats;

use std::sync::Arc;
use std::time::Duration;

use av_core::{AuditStore, CommandLog, CommandLogEntry};
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout_at};

/// Background consumer that batches queued entries into the store.
pub(crate) struct FlushWorker {
    pub(crate) receiver: mpsc::Receiver<CommandLogEntry>,
    pub(crate) store: Arc<dyn AuditStore>,
    pub(crate) stats: Arc<AuditStats>,
    pub(crate) batch_size: usize,
    pub(crate) flush_interval: Duration,
    pub(crate) shutdown_grace: Duration,
}

impl FlushWorker {
    /// Batch until told to stop, then drain within the deadline carried by
    /// the stop signal. A dropped stop sender counts as a stop request.
    pub(crate) async fn run(mut self, mut stop: oneshot::Receiver<Instant>) {
        let mut batch = Vec::with_capacity(self.batch_size);
        let mut ticker = interval_at(Instant::now() + self.flush_interval, self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let deadline = loop {
            tokio::select! {
                signal = &mut stop => {
                    break signal.unwrap_or_else(|_| Instant::now() + self.shutdown_grace);
                }
                received = self.receiver.recv() => match received {
                    Some(entry) => {
                        batch.push(entry.into_record(Utc::now()));
                        if batch.len() >= self.batch_size {
                            self.flush(&mut batch).await;
                        }
                    }
                    None => {
                        debug!("All audit producers gone");
                        break Instant::now() + self.shutdown_grace;
                    }
                },
                _ = ticker.tick() => {
                    if !batch.is_empty() {
                        self.flush(&mut batch).await;
                    }
                }
            }
        };

        self.drain(batch, deadline).await;
    }

    async fn flush(&self, batch: &mut Vec<CommandLog>) {
        let count = batch.len() as u64;
        match self.store.persist_batch(batch).await {
            Ok(()) => {
                debug!("Flushed {count} audit records");
                self.stats.record_persisted(count);
            }
            Err(e) => {
                error!("Failed to persist {count} audit records: {e}");
                self.stats.record_failed(count);
            }
        }
        batch.clear();
    }

    async fn drain(mut self, mut batch: Vec<CommandLog>, deadline: Instant) {
        self.receiver.close();

        loop {
            while batch.len() < self.batch_size {
                match self.receiver.try_recv() {
                    Ok(entry) => batch.push(entry.into_record(Utc::now())),
                    Err(_) => break,
                }
            }
            if batch.is_empty() {
                break;
            }

            let count = batch.len() as u64;
            match timeout_at(deadline, self.store.persist_batch(&batch)).await {
                Ok(Ok(())) => self.stats.record_persisted(count),
                Ok(Err(e)) => {
                    error!("Final audit flush of {count} records failed: {e}");
                    self.stats.record_failed(count);
                }
                Err(_) => {
                    warn!("Audit shutdown grace elapsed with {count} records unflushed");
                    self.stats.record_discarded(count);
                    batch.clear();
                    break;
                }
            }
            batch.clear();

            if Instant::now() >= deadline {
                break;
            }
        }

        let mut leftovers = 0u64;
        while self.receiver.try_recv().is_ok() {
            leftovers += 1;
        }
        if leftovers > 0 {
            warn!("Discarding {leftovers} queued audit entries at shutdown");
            self.stats.record_discarded(leftovers);
        }

        info!("Audit flush worker stopped");
    }
}
