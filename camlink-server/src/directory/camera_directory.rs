use camlink_core::{CameraEntry, PeerId};
use std::collections::BTreeMap;

/// Maps a camera's external id to the connection currently serving it.
/// Last registration wins.
#[derive(Debug, Default)]
pub struct CameraDirectory {
    cameras: BTreeMap<String, PeerId>,
}

impl CameraDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous holder when a different connection owned the id.
    pub fn register_camera(&mut self, camera_id: impl Into<String>, peer_id: PeerId) -> Option<PeerId> {
        self.cameras
            .insert(camera_id.into(), peer_id)
            .filter(|previous| *previous != peer_id)
    }

    pub fn lookup(&self, camera_id: &str) -> Option<PeerId> {
        self.cameras.get(camera_id).copied()
    }

    /// Drops every id held by `peer_id`. Returns how many were removed.
    pub fn unregister(&mut self, peer_id: &PeerId) -> usize {
        let before = self.cameras.len();
        self.cameras.retain(|_, holder| holder != peer_id);
        before - self.cameras.len()
    }

    /// Snapshot ordered by camera id.
    pub fn list_cameras(&self) -> Vec<CameraEntry> {
        self.cameras
            .iter()
            .map(|(camera_id, peer_id)| CameraEntry {
                peer_id: *peer_id,
                camera_id: camera_id.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}
