pub mod audit_logger;
pub mod audit_service;
pub mod audit_service_config;
pub mod audit_state;
pub mod audit_stats;
mod flush_worker;

pub use audit_logger::AuditLogger;
pub use audit_service::{AuditService, ShutdownReport};
pub use audit_service_config::AuditServiceConfig;
pub use audit_state::AuditState;
pub use audit_stats::{AuditStats, AuditStatsSnapshot};

#[cfg(test)]
mod tests;
