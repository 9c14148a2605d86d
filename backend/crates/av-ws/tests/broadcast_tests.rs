mod common;

use common::{connect_as, create_test_server, receive_event};

use std::time::Duration;

use serde_json::json;

async fn wait_for_clients(hub: &av_ws::HubHandle, expected: usize) {
    for _ in 0..100 {
        if hub.client_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {expected} clients, have {}", hub.client_count());
}

#[tokio::test]
async fn given_viewer_when_connecting_then_receives_own_user_connected() {
    // Given
    let server = create_test_server();

    // When
    let mut alice = connect_as(&server.server, "alice").await;

    // Then
    let event = receive_event(&mut alice).await;
    assert_eq!(event["type"], "user_connected");
    assert_eq!(event["data"]["user_id"], "alice");
}

#[tokio::test]
async fn given_two_viewers_when_command_broadcast_then_each_receives_it_once() {
    // Given
    let server = create_test_server();
    let mut alice = connect_as(&server.server, "alice").await;
    assert_eq!(receive_event(&mut alice).await["type"], "user_connected");
    let mut bob = connect_as(&server.server, "bob").await;
    assert_eq!(receive_event(&mut bob).await["data"]["user_id"], "bob");
    let bob_joined = receive_event(&mut alice).await;
    assert_eq!(bob_joined["data"]["user_id"], "bob");

    // When
    server
        .hub
        .broadcast_command_executed("carol", "carol", "player.play", Some(json!({ "song": 2 })));

    // Then
    for ws in [&mut alice, &mut bob] {
        let event = receive_event(ws).await;
        assert_eq!(event["type"], "command_executed");
        assert_eq!(event["data"]["command"], "player.play");
        assert_eq!(event["data"]["payload"]["song"], 2);
    }
}

#[tokio::test]
async fn given_viewer_when_disconnecting_then_others_receive_user_disconnected() {
    // Given
    let server = create_test_server();
    let alice = connect_as(&server.server, "alice").await;
    let mut bob = connect_as(&server.server, "bob").await;
    assert_eq!(receive_event(&mut bob).await["data"]["user_id"], "bob");
    wait_for_clients(&server.hub, 2).await;

    // When
    alice.close().await;

    // Then
    let event = receive_event(&mut bob).await;
    assert_eq!(event["type"], "user_disconnected");
    assert_eq!(event["data"]["user_id"], "alice");
    wait_for_clients(&server.hub, 1).await;
}
