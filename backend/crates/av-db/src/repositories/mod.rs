pub mod command_log_repository;
