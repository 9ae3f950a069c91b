use serde_json::json;

use crate::utils::{connect_peer, init_tracing, send_json, spawn_hub};

#[tokio::test]
async fn test_malformed_frame_reported_to_sender_only() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    let mut b = connect_peer(&hub, None).await;
    a.expect_welcome().await;
    b.expect_welcome().await;
    a.next_signal().await;

    hub.handle_frame(a.id, b"{\"type\": ").await;

    let report = a.next_signal().await;
    assert_eq!(report["type"], "error");
    assert!(
        report["message"]
            .as_str()
            .unwrap()
            .starts_with("malformed message")
    );
    b.expect_silence(&hub).await;

    // The connection is still usable afterwards.
    send_json(
        &hub,
        &a,
        json!({"type": "offer", "target": b.id.0, "payload": "sdp"}),
    )
    .await;
    assert_eq!(b.next_signal().await["type"], "offer");
}

#[tokio::test]
async fn test_protocol_violations_are_not_relayed() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    let mut b = connect_peer(&hub, None).await;
    a.expect_welcome().await;
    b.expect_welcome().await;
    a.next_signal().await;

    send_json(&hub, &a, json!({"type": "chat", "target": b.id.0})).await;
    send_json(&hub, &a, json!({"type": "new-peer", "peerId": 99})).await;
    send_json(&hub, &a, json!({"type": "answer", "payload": "no target"})).await;
    send_json(&hub, &a, json!({"type": "answer", "target": b.id.0})).await;

    for _ in 0..4 {
        assert_eq!(a.next_signal().await["type"], "error");
    }
    a.expect_silence(&hub).await;
    b.expect_silence(&hub).await;
}
