use std::collections::{BTreeSet, HashSet};

use crate::utils::{TestPeer, connect_peer, init_tracing, settle, spawn_hub};

const PEERS: usize = 24;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_are_symmetric() {
    init_tracing();

    let hub = spawn_hub();

    let tasks: Vec<_> = (0..PEERS)
        .map(|_| {
            let hub = hub.clone();
            tokio::spawn(async move { connect_peer(&hub, Some("swarm")).await })
        })
        .collect();

    let mut peers: Vec<TestPeer> = Vec::new();
    for task in tasks {
        peers.push(task.await.expect("connect task panicked"));
    }
    settle(&hub).await;

    let ids: HashSet<u64> = peers.iter().map(|p| p.id.0).collect();
    assert_eq!(ids.len(), PEERS, "identities must be pairwise distinct");

    for peer in &mut peers {
        let listed: BTreeSet<u64> = peer.expect_welcome().await.into_iter().collect();

        let mut announced = BTreeSet::new();
        while let Ok(frame) = peer.rx.try_recv() {
            let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(value["type"], "new-peer");
            assert!(announced.insert(value["peerId"].as_u64().unwrap()));
        }

        // Every other peer is seen exactly once: either already present at
        // join time, or announced afterwards.
        assert!(listed.is_disjoint(&announced));
        let seen: BTreeSet<u64> = listed.union(&announced).copied().collect();
        let others: BTreeSet<u64> = ids.iter().copied().filter(|&id| id != peer.id.0).collect();
        assert_eq!(seen, others);
    }
}
