use serde_json::json;

use crate::utils::{MockPeerSink, connect_peer, init_tracing, settle, spawn_hub};

#[tokio::test]
async fn test_disconnect_announces_departure() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    let mut b = connect_peer(&hub, None).await;
    a.expect_welcome().await;
    b.expect_welcome().await;
    a.next_signal().await; // new-peer for b

    hub.disconnect(b.id).await;

    assert_eq!(
        a.next_signal().await,
        json!({"type": "peer-disconnected", "peerId": b.id.0})
    );
    assert!(!hub.registry().contains(b.id));
    assert!(b.is_closed(&hub).await);
}

#[tokio::test]
async fn test_dropped_lease_tears_down() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    let b = connect_peer(&hub, None).await;
    a.expect_welcome().await;
    a.next_signal().await;

    let b_id = b.id;
    assert_eq!(b.lease.identity().room, None);
    drop(b);

    assert_eq!(
        a.next_signal().await,
        json!({"type": "peer-disconnected", "peerId": b_id.0})
    );
    assert_eq!(hub.stats().await.unwrap().connections, 1);
}

#[tokio::test]
async fn test_abandoned_connect_is_released() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    a.expect_welcome().await;

    let (sink, _rx) = MockPeerSink::new();
    let mut connecting = Box::pin(hub.connect(None, Box::new(sink)));

    // First poll queues the command and parks on the reply.
    assert!(futures::poll!(connecting.as_mut()).is_pending());
    // The hub registers the peer and answers, but nobody reads the answer.
    settle(&hub).await;
    drop(connecting);

    let joined = a.next_signal().await;
    assert_eq!(joined["type"], "new-peer");
    assert_eq!(
        a.next_signal().await,
        json!({"type": "peer-disconnected", "peerId": joined["peerId"]})
    );
    assert_eq!(hub.stats().await.unwrap().connections, 1);
}
