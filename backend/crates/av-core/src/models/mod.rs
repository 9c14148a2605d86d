pub mod command_log;
pub mod command_log_entry;
pub mod identity;
