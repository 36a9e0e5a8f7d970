use crate::error::SignalError;
use crate::registry::peer::Peer;
use camlink_core::{PeerId, PeerMetadata, PeerState, Role, RoomId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Every live connection, keyed by the id handed out on connect.
///
/// Owned by the hub task; nothing else mutates it.
pub struct Registry {
    peers: HashMap<PeerId, Peer>,
    max_peers: usize,
}

impl Registry {
    pub fn new(max_peers: usize) -> Self {
        Self {
            peers: HashMap::new(),
            max_peers,
        }
    }

    pub fn register(&mut self) -> Result<PeerId, SignalError> {
        if self.peers.len() >= self.max_peers {
            warn!("Registry full ({} peers), refusing connection", self.peers.len());
            return Err(SignalError::RegistryFull);
        }

        let id = PeerId::new();
        self.peers.insert(id, Peer::new(id));
        debug!("Registered peer {}", id);
        Ok(id)
    }

    pub fn set_role(&mut self, id: &PeerId, role: Role, metadata: PeerMetadata) -> bool {
        let Some(peer) = self.peers.get_mut(id) else {
            return false;
        };
        peer.role = role;
        peer.metadata = metadata;
        true
    }

    pub fn get(&self, id: &PeerId) -> Option<&Peer> {
        self.peers.get(id)
    }

    pub fn contains(&self, id: &PeerId) -> bool {
        self.peers.contains_key(id)
    }

    /// Removes the peer and hands it back marked `Closed`.
    ///
    /// Only the first call for a given id returns `Some`; callers run their
    /// cascading cleanup on that value, which makes cleanup happen once.
    pub fn remove(&mut self, id: &PeerId) -> Option<Peer> {
        let mut peer = self.peers.remove(id)?;
        peer.state = PeerState::Closed;
        Some(peer)
    }

    pub fn set_waiting(&mut self, id: &PeerId) {
        if let Some(peer) = self.peers.get_mut(id) {
            peer.state = PeerState::Waiting;
            peer.room_id = None;
        }
    }

    pub fn set_idle(&mut self, id: &PeerId) {
        if let Some(peer) = self.peers.get_mut(id) {
            peer.state = PeerState::Idle;
            peer.room_id = None;
        }
    }

    pub(crate) fn set_matched(&mut self, id: &PeerId, room_id: RoomId) {
        if let Some(peer) = self.peers.get_mut(id) {
            peer.state = PeerState::Matched;
            peer.room_id = Some(room_id);
        }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
