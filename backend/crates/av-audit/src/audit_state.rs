use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of the audit sink: `Stopped -> Running -> Draining -> Stopped`.
/// There is no way back to `Running` once draining has begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditState {
    Stopped,
    Running,
    Draining,
}

impl AuditState {
    fn as_u8(self) -> u8 {
        match self {
            Self::Stopped => 0,
            Self::Running => 1,
            Self::Draining => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// Shared, lock-free holder of the current state
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: AuditState) -> Self {
        Self(AtomicU8::new(state.as_u8()))
    }

    pub(crate) fn get(&self) -> AuditState {
        AuditState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: AuditState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}
