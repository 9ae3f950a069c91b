use serde_json::json;

use crate::utils::{connect_peer, init_tracing, spawn_hub};

#[tokio::test]
async fn test_leave_reaches_healthy_peers_when_one_fails() {
    init_tracing();

    let hub = spawn_hub();
    let mut first = connect_peer(&hub, Some("mesh")).await;
    let mut second = connect_peer(&hub, Some("mesh")).await;
    let mut third = connect_peer(&hub, Some("mesh")).await;
    let leaver = connect_peer(&hub, Some("mesh")).await;

    for peer in [&mut first, &mut second, &mut third] {
        peer.expect_welcome().await;
    }
    first.rx.close();
    while first.rx.try_recv().is_ok() {}

    second.switch.set_failing(true);
    while second.rx.try_recv().is_ok() {}
    while third.rx.try_recv().is_ok() {}

    hub.disconnect(leaver.id).await;

    // `first` has closed its receiving end, `second` refuses the send;
    // `third` is reached regardless.
    assert_eq!(
        third.next_signal().await,
        json!({"type": "peer-disconnected", "peerId": leaver.id.0})
    );
    second.expect_silence(&hub).await;
}

#[tokio::test]
async fn test_one_broken_sink_among_three() {
    init_tracing();

    let hub = spawn_hub();
    let mut a = connect_peer(&hub, None).await;
    let mut b = connect_peer(&hub, None).await;
    let mut c = connect_peer(&hub, None).await;
    let leaver = connect_peer(&hub, None).await;

    a.expect_welcome().await;
    b.expect_welcome().await;
    c.expect_welcome().await;
    for _ in 0..3 {
        a.next_signal().await;
    }
    for _ in 0..2 {
        b.next_signal().await;
    }
    c.next_signal().await;

    b.switch.set_failing(true);
    hub.disconnect(leaver.id).await;

    let expected = json!({"type": "peer-disconnected", "peerId": leaver.id.0});
    assert_eq!(a.next_signal().await, expected);
    assert_eq!(c.next_signal().await, expected);
    b.expect_silence(&hub).await;
}
