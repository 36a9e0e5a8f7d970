use std::collections::HashMap;

use camlink_core::{PeerState, RoomId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{TestPeer, settle};

const PEERS: usize = 8;
const STEPS: usize = 300;
const SEEDS: [u64; 3] = [0x5eed, 7, 2024];

#[tokio::test]
async fn test_states_stay_consistent_under_random_traffic() {
    init_tracing();

    for seed in SEEDS {
        run_random_traffic(seed).await;
    }
}

async fn run_random_traffic(seed: u64) {
    let (hub, signaling) = create_test_hub();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut peers = Vec::with_capacity(PEERS);
    for _ in 0..PEERS {
        peers.push(TestPeer::connect(&hub, &signaling).await.unwrap());
    }

    for step in 0..STEPS {
        let slot = rng.gen_range(0..PEERS);
        match rng.gen_range(0..4) {
            0 | 1 => peers[slot].send_json(json!({"type": "next"})).await.unwrap(),
            2 => peers[slot].send_json(json!({"type": "leave"})).await.unwrap(),
            _ => {
                let fresh = TestPeer::connect(&hub, &signaling).await.unwrap();
                let gone = std::mem::replace(&mut peers[slot], fresh);
                gone.disconnect().await.unwrap();
            }
        }
        settle(&hub).await.unwrap();

        let mut waiting = 0;
        let mut members: HashMap<RoomId, usize> = HashMap::new();

        for peer in &peers {
            let state = peer.state().await.unwrap();
            match state.state {
                PeerState::Matched => {
                    let room_id = state
                        .room_id
                        .unwrap_or_else(|| panic!("seed {seed} step {step}: matched peer without room"));
                    *members.entry(room_id).or_default() += 1;
                }
                PeerState::Waiting => {
                    assert!(state.room_id.is_none(), "seed {seed} step {step}: waiting peer in a room");
                    waiting += 1;
                }
                PeerState::Idle => {
                    assert!(state.room_id.is_none(), "seed {seed} step {step}: idle peer in a room");
                }
                PeerState::Closed => panic!("seed {seed} step {step}: live peer marked closed"),
            }
        }

        let stats = hub.stats().await.unwrap();
        assert_eq!(stats.peers, PEERS, "seed {seed} step {step}: registry leaked peers");
        assert_eq!(stats.waiting, waiting, "seed {seed} step {step}: queue out of sync");
        assert!(waiting <= 1, "seed {seed} step {step}: two peers waiting unpaired");
        assert_eq!(stats.rooms, members.len(), "seed {seed} step {step}: room count");
        assert!(
            members.values().all(|&count| count == 2),
            "seed {seed} step {step}: room without exactly two members: {members:?}"
        );
    }
}
