#![allow(dead_code)]

use av_core::{CommandLog, CommandLogEntry, Identity};

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A command log executed `offset_secs` relative to now
pub fn create_test_log_at(command_type: &str, offset_secs: i64) -> CommandLog {
    let identity = Identity::new("user-1", "alice", "operator");
    CommandLogEntry::success(&identity, command_type, "{\"value\":1}", 15, "192.168.1.10")
        .into_record(Utc::now() + Duration::seconds(offset_secs))
}
