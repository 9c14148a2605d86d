pub mod audit_log;
pub mod caller;
pub mod commands;
pub mod error;
pub mod middleware;
pub mod status;
