pub mod connection;
pub mod error;
pub mod repositories;
pub mod sqlite_audit_store;

pub use connection::connect;
pub use error::{DbError, Result};
pub use repositories::command_log_repository::CommandLogRepository;
pub use sqlite_audit_store::SqliteAuditStore;
