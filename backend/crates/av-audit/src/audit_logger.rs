use crate::{AuditStats, AuditStatsSnapshot};

use std::sync::Arc;

use av_core::CommandLogEntry;
use log::{debug, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Cloneable producer side of the audit queue.
///
/// Enqueueing never waits: when the queue is full or the sink has shut
/// down the entry is dropped, counted and a warning is logged.
#[derive(Clone)]
pub struct AuditLogger {
    sender: mpsc::Sender<CommandLogEntry>,
    stats: Arc<AuditStats>,
}

impl AuditLogger {
    pub(crate) fn new(sender: mpsc::Sender<CommandLogEntry>, stats: Arc<AuditStats>) -> Self {
        Self { sender, stats }
    }

    /// Counters shared with the owning [`AuditService`](crate::AuditService)
    pub fn stats(&self) -> AuditStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn log_command(&self, entry: CommandLogEntry) {
        match self.sender.try_send(entry) {
            Ok(()) => {
                self.stats.record_accepted();
            }
            Err(TrySendError::Full(entry)) => {
                self.stats.record_rejected();
                warn!(
                    "Audit queue full, dropping {} by {} ({})",
                    entry.command_type, entry.username, entry.user_id
                );
            }
            Err(TrySendError::Closed(entry)) => {
                self.stats.record_rejected();
                debug!(
                    "Audit sink closed, dropping {} by {}",
                    entry.command_type, entry.username
                );
            }
        }
    }
}
