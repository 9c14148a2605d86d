
use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use av_core::{AuditStore, CommandLog, CommandLogEntry, CoreError, Identity, Result};

/// In-memory store recording the size of every batch it receives
#[derive(Default)]
pub(crate) struct RecordingStore {
    batches: Mutex<Vec<usize>>,
    calls: Mutex<usize>,
    failing_calls: HashSet<usize>,
    hang: bool,
}

impl RecordingStore {
    /// Store whose n-th call (1-based) returns an error
    pub(crate) fn failing_on(calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Store that never completes a write
    pub(crate) fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for RecordingStore {
    async fn persist_batch(&self, records: &[CommandLog]) -> Result<()> {
        if self.hang {
            std::future::pending::<()>().await;
        }

        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.failing_calls.contains(&call) {
            return Err(CoreError::storage("disk full"));
        }

        self.batches.lock().unwrap().push(records.len());
        Ok(())
    }
}

pub(crate) fn entry(n: usize) -> CommandLogEntry {
    let identity = Identity::new("user-1", "alice", "operator");
    CommandLogEntry::success(&identity, format!("power.on.{n}"), "", 5, "127.0.0.1")
}
