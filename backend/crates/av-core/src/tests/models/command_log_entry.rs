use crate::{CommandLogEntry, Identity};

use chrono::Utc;

fn operator() -> Identity {
    Identity::new("user-1", "alice", "operator")
}

#[test]
fn given_remote_ip_when_entry_created_then_marked_remote() {
    let entry = CommandLogEntry::success(&operator(), "player.play", "", 12, "10.0.0.7");

    assert!(entry.success);
    assert!(entry.is_remote_access);
    assert_eq!(entry.username, "alice");
    assert_eq!(entry.execution_time_ms, 12);
}

#[test]
fn given_loopback_ip_when_entry_created_then_marked_local() {
    let entry = CommandLogEntry::success(&operator(), "player.play", "", 3, "127.0.0.1");

    assert!(!entry.is_remote_access);
}

#[test]
fn given_failed_entry_when_converted_then_record_keeps_error() {
    let executed_at = Utc::now();
    let record = CommandLogEntry::success(&operator(), "recorder.start", "{}", 40, "::1")
        .failed("device busy")
        .into_record(executed_at);

    assert!(!record.success);
    assert_eq!(record.error_message, "device busy");
    assert_eq!(record.command_payload, "{}");
    assert_eq!(record.executed_at, executed_at);
    assert_eq!(record.user_id, "user-1");
}
