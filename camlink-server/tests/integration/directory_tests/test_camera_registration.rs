use camlink_core::{CameraEntry, Role, ServerMessage};
use serde_json::json;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{TestPeer, expect_error};

async fn register_camera(peer: &mut TestPeer, camera_id: &str) {
    peer.send_json(json!({"type": "register", "role": "camera", "camera_id": camera_id}))
        .await
        .unwrap();
    assert_eq!(
        peer.recv().await.unwrap(),
        ServerMessage::Registered {
            peer_id: peer.peer_id
        }
    );
}

async fn list_cameras(peer: &mut TestPeer) -> Vec<CameraEntry> {
    peer.send_json(json!({"type": "list-cameras"})).await.unwrap();
    match peer.recv().await.unwrap() {
        ServerMessage::CameraList { cameras } => cameras,
        other => panic!("Expected camera-list, got {:?}", other),
    }
}

#[tokio::test]
async fn test_registration_is_idempotent() {
    init_tracing();

    let (hub, signaling) = create_test_hub();
    let mut camera = TestPeer::connect(&hub, &signaling).await.unwrap();

    register_camera(&mut camera, "cam-1").await;
    register_camera(&mut camera, "cam-1").await;

    assert_eq!(hub.stats().await.unwrap().cameras, 1);
    let state = camera.state().await.unwrap();
    assert_eq!(state.role, Role::Camera);
    assert_eq!(state.metadata.camera_id.as_deref(), Some("cam-1"));
}

#[tokio::test]
async fn test_reregistration_moves_camera_id() {
    init_tracing();

    let (hub, signaling) = create_test_hub();
    let mut camera = TestPeer::connect(&hub, &signaling).await.unwrap();

    register_camera(&mut camera, "cam-1").await;
    register_camera(&mut camera, "cam-2").await;

    let cameras = list_cameras(&mut camera).await;
    assert_eq!(
        cameras,
        vec![CameraEntry {
            peer_id: camera.peer_id,
            camera_id: "cam-2".into()
        }]
    );
}

#[tokio::test]
async fn test_list_cameras_sorted() {
    init_tracing();

    let (hub, signaling) = create_test_hub();
    let mut viewer = TestPeer::connect(&hub, &signaling).await.unwrap();
    assert!(list_cameras(&mut viewer).await.is_empty());

    let mut garage = TestPeer::connect(&hub, &signaling).await.unwrap();
    let mut attic = TestPeer::connect(&hub, &signaling).await.unwrap();
    register_camera(&mut garage, "garage").await;
    register_camera(&mut attic, "attic").await;

    let cameras = list_cameras(&mut viewer).await;
    let ids: Vec<_> = cameras.iter().map(|c| c.camera_id.as_str()).collect();
    assert_eq!(ids, ["attic", "garage"]);
    assert_eq!(cameras[0].peer_id, attic.peer_id);
}

#[tokio::test]
async fn test_conflicting_registration_last_wins() {
    init_tracing();

    let (hub, signaling) = create_test_hub();
    let mut viewer = TestPeer::connect(&hub, &signaling).await.unwrap();
    let mut old = TestPeer::connect(&hub, &signaling).await.unwrap();
    let mut new = TestPeer::connect(&hub, &signaling).await.unwrap();

    register_camera(&mut old, "cam-42").await;
    register_camera(&mut new, "cam-42").await;

    viewer
        .send_json(json!({"type": "offer", "target_peer_id": "cam-42", "sdp": "x"}))
        .await
        .unwrap();
    assert!(matches!(new.recv().await.unwrap(), ServerMessage::Offer(_)));
    old.expect_silence().await.unwrap();

    // The replaced connection closing leaves the new holder in place.
    old.disconnect().await.unwrap();
    let cameras = list_cameras(&mut viewer).await;
    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0].peer_id, new.peer_id);
}

#[tokio::test]
async fn test_disconnect_removes_camera() {
    init_tracing();

    let (hub, signaling) = create_test_hub();
    let mut viewer = TestPeer::connect(&hub, &signaling).await.unwrap();
    let mut camera = TestPeer::connect(&hub, &signaling).await.unwrap();
    register_camera(&mut camera, "cam-42").await;

    camera.disconnect().await.unwrap();

    assert!(list_cameras(&mut viewer).await.is_empty());
    viewer
        .send_json(json!({"type": "offer", "target_peer_id": "cam-42", "sdp": "x"}))
        .await
        .unwrap();
    assert_eq!(
        expect_error(&mut viewer).await.unwrap(),
        "Target peer not found"
    );
}

#[tokio::test]
async fn test_camera_without_id_is_malformed() {
    init_tracing();

    let (hub, signaling) = create_test_hub();
    let mut camera = TestPeer::connect(&hub, &signaling).await.unwrap();

    camera
        .send_json(json!({"type": "register", "role": "camera"}))
        .await
        .unwrap();

    let message = expect_error(&mut camera).await.unwrap();
    assert!(message.starts_with("Malformed message"), "got {message}");
    assert_eq!(camera.state().await.unwrap().role, Role::Unassigned);
    assert_eq!(hub.stats().await.unwrap().cameras, 0);
}
