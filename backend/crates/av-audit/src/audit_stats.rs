use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by producers, the flush worker and shutdown
#[derive(Debug, Default)]
pub struct AuditStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
    persisted: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

/// Point-in-time copy of [`AuditStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditStatsSnapshot {
    /// Entries that made it into the queue
    pub accepted: u64,
    /// Entries refused at enqueue (queue full or sink closed)
    pub rejected: u64,
    /// Entries written by the store
    pub persisted: u64,
    /// Entries lost to a failed persistence call
    pub failed: u64,
    /// Accepted entries thrown away during shutdown
    pub discarded: u64,
}

impl AuditStats {
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("av_audit.entries.rejected").increment(1);
    }

    pub(crate) fn record_persisted(&self, count: u64) {
        self.persisted.fetch_add(count, Ordering::Relaxed);
        metrics::counter!("av_audit.entries.persisted").increment(count);
    }

    pub(crate) fn record_failed(&self, count: u64) {
        self.failed.fetch_add(count, Ordering::Relaxed);
        metrics::counter!("av_audit.entries.failed").increment(count);
    }

    pub(crate) fn record_discarded(&self, count: u64) {
        self.discarded.fetch_add(count, Ordering::Relaxed);
        metrics::counter!("av_audit.entries.discarded").increment(count);
    }

    pub fn snapshot(&self) -> AuditStatsSnapshot {
        AuditStatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

impl AuditStatsSnapshot {
    /// Accepted entries with no outcome yet
    pub fn outstanding(&self) -> u64 {
        self.accepted
            .saturating_sub(self.persisted)
            .saturating_sub(self.failed)
            .saturating_sub(self.discarded)
    }

    /// Every entry that will never reach the store
    pub fn dropped(&self) -> u64 {
        self.rejected + self.failed + self.discarded
    }
}
