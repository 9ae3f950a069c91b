use serde_json::json;

use crate::utils::{connect_peer, init_tracing, send_json, settle, spawn_hub};

#[tokio::test]
async fn test_offer_to_departed_peer_is_dropped() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    let b = connect_peer(&hub, None).await;
    a.expect_welcome().await;
    a.next_signal().await;

    hub.disconnect(b.id).await;
    a.next_signal().await; // peer-disconnected
    settle(&hub).await;

    send_json(
        &hub,
        &a,
        json!({"type": "offer", "target": b.id.0, "payload": "sdp"}),
    )
    .await;
    send_json(
        &hub,
        &a,
        json!({"type": "ice-candidate", "target": 4242, "payload": "cand"}),
    )
    .await;

    // No error surfaces to the sender.
    a.expect_silence(&hub).await;
    assert!(hub.registry().contains(a.id));
}
