mod common;

use common::{create_test_log_at, create_test_pool};

use av_core::{AuditStore, CommandLogEntry, Identity};
use av_db::{CommandLogRepository, SqliteAuditStore, connect};

use chrono::Utc;
use googletest::prelude::*;

#[tokio::test]
async fn given_batch_when_inserted_then_all_rows_persisted() {
    // Given
    let pool = create_test_pool().await;
    let logs: Vec<_> = (0..100)
        .map(|i| create_test_log_at("player.play", -i))
        .collect();

    // When
    let written = CommandLogRepository::insert_batch(&pool, &logs).await.unwrap();

    // Then
    assert_that!(written, eq(100));
    assert_that!(CommandLogRepository::count(&pool).await.unwrap(), eq(100));
}

#[tokio::test]
async fn given_batch_beyond_one_statement_when_inserted_then_all_rows_persisted() {
    // Given
    let pool = create_test_pool().await;
    let logs: Vec<_> = (0..5000)
        .map(|i| create_test_log_at("controls.volume.set", -i))
        .collect();

    // When
    let written = CommandLogRepository::insert_batch(&pool, &logs).await.unwrap();

    // Then
    assert_that!(written, eq(5000));
    assert_that!(CommandLogRepository::count(&pool).await.unwrap(), eq(5000));
}

#[tokio::test]
async fn given_duplicate_in_late_statement_when_inserted_then_earlier_statements_rolled_back() {
    // Given
    let pool = create_test_pool().await;
    let mut logs: Vec<_> = (0..4000)
        .map(|i| create_test_log_at("player.next", -i))
        .collect();
    logs.push(logs[0].clone());

    // When
    let result = CommandLogRepository::insert_batch(&pool, &logs).await;

    // Then
    assert_that!(result, err(anything()));
    assert_that!(CommandLogRepository::count(&pool).await.unwrap(), eq(0));
}

#[tokio::test]
async fn given_empty_batch_when_inserted_then_nothing_written() {
    let pool = create_test_pool().await;

    let written = CommandLogRepository::insert_batch(&pool, &[]).await.unwrap();

    assert_that!(written, eq(0));
    assert_that!(CommandLogRepository::count(&pool).await.unwrap(), eq(0));
}

#[tokio::test]
async fn given_logs_when_recent_then_newest_first_with_fields_intact() {
    // Given
    let pool = create_test_pool().await;
    let older = create_test_log_at("player.stop", -10);
    let newer = create_test_log_at("player.play", -1);
    CommandLogRepository::insert_batch(&pool, &[older.clone(), newer.clone()])
        .await
        .unwrap();

    // When
    let logs = CommandLogRepository::recent(&pool, 10).await.unwrap();

    // Then
    assert_that!(logs, len(eq(2)));
    assert_that!(logs[0].id, eq(newer.id));
    assert_that!(logs[1].id, eq(older.id));
    assert_that!(logs[0].command_payload, eq("{\"value\":1}"));
    assert_that!(logs[0].is_remote_access, eq(true));
    assert_that!(
        logs[0].executed_at.timestamp_millis(),
        eq(newer.executed_at.timestamp_millis())
    );
}

#[tokio::test]
async fn given_failed_command_when_persisted_then_error_kept() {
    let pool = create_test_pool().await;
    let identity = Identity::new("user-2", "bob", "viewer");
    let log = CommandLogEntry::success(&identity, "recorder.start", "", 250, "127.0.0.1")
        .failed("disk full")
        .into_record(Utc::now());

    CommandLogRepository::insert_batch(&pool, &[log]).await.unwrap();
    let logs = CommandLogRepository::recent(&pool, 1).await.unwrap();

    assert_that!(logs[0].success, eq(false));
    assert_that!(logs[0].error_message, eq("disk full"));
    assert_that!(logs[0].is_remote_access, eq(false));
    assert_that!(logs[0].execution_time_ms, eq(250));
}

#[tokio::test]
async fn given_duplicate_id_in_batch_when_inserted_then_whole_batch_rejected() {
    let pool = create_test_pool().await;
    let log = create_test_log_at("player.next", 0);

    let result = CommandLogRepository::insert_batch(&pool, &[log.clone(), log]).await;

    assert_that!(result, err(anything()));
    assert_that!(CommandLogRepository::count(&pool).await.unwrap(), eq(0));
}

#[tokio::test]
async fn given_audit_store_when_batch_persisted_then_rows_visible() {
    let store = SqliteAuditStore::new(create_test_pool().await);
    let logs = vec![
        create_test_log_at("presets.load", -2),
        create_test_log_at("controls.volume.set", -1),
    ];

    store.persist_batch(&logs).await.unwrap();

    assert_that!(
        CommandLogRepository::count(store.pool()).await.unwrap(),
        eq(2)
    );
}

#[tokio::test]
async fn given_file_path_when_connect_then_database_created_and_migrated() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("audit.db");

    let pool = connect(&path).await.unwrap();

    assert_that!(path.exists(), eq(true));
    assert_that!(CommandLogRepository::count(&pool).await.unwrap(), eq(0));
}
