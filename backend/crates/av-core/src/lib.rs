pub mod audit_store;
pub mod command;
pub mod error;
pub mod models;
pub mod status_provider;

pub use audit_store::AuditStore;
pub use command::{command_type, is_remote_access, should_audit};
pub use error::{CoreError, Result};
pub use models::command_log::CommandLog;
pub use models::command_log_entry::CommandLogEntry;
pub use models::identity::Identity;
pub use status_provider::{StatusProvider, StatusSnapshot};

pub use error_location::ErrorLocation;

#[cfg(test)]
mod tests;
