use crate::directory::CameraDirectory;
use crate::error::SignalError;
use crate::hub::{HubCommand, HubHandle, HubStats};
use crate::matchmaking::{Enqueued, MatchQueue};
use crate::registry::Registry;
use crate::room::RoomManager;
use crate::signaling::{Relay, SignalingOutput};
use camlink_core::{
    CallRole, ClientMessage, PeerId, PeerMetadata, RegisterRole, RelayKind, RelayPayload, Role,
    RoomId, ServerMessage,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_MAX_PEERS: usize = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct HubSettings {
    pub max_peers: usize,
    /// Put the survivor of a closed room straight back into the queue
    /// instead of waiting for its `next`.
    pub auto_requeue: bool,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            max_peers: DEFAULT_MAX_PEERS,
            auto_requeue: false,
        }
    }
}

/// Основной актор сигнального сервера.
/// Владеет реестром, очередью, каталогом камер и комнатами; все изменения
/// состояния проходят через его канал команд по одной.
pub struct Hub {
    registry: Registry,
    rooms: RoomManager,
    queue: MatchQueue,
    directory: CameraDirectory,

    /// Интерфейс для отправки сообщений клиентам.
    signaling: Arc<dyn SignalingOutput>,

    /// Канал для приема команд от соединений.
    command_rx: mpsc::Receiver<HubCommand>,

    auto_requeue: bool,
}

impl Hub {
    pub fn new(
        settings: HubSettings,
        command_rx: mpsc::Receiver<HubCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            registry: Registry::new(settings.max_peers),
            rooms: RoomManager::new(),
            queue: MatchQueue::new(),
            directory: CameraDirectory::new(),
            signaling,
            command_rx,
            auto_requeue: settings.auto_requeue,
        }
    }

    /// Starts the hub on the current runtime and returns a handle to it.
    pub fn spawn(
        settings: HubSettings,
        signaling: Arc<dyn SignalingOutput>,
        buffer: usize,
    ) -> HubHandle {
        let (tx, rx) = mpsc::channel(buffer);
        let hub = Hub::new(settings, rx, signaling);
        tokio::spawn(hub.run());
        HubHandle::new(tx)
    }

    pub async fn run(mut self) {
        info!("Signaling hub started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Signaling hub finished");
    }

    async fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Connect { reply } => {
                let result = self.registry.register();
                // The connection went away before it got its id.
                if let Err(Ok(peer_id)) = reply.send(result) {
                    self.registry.remove(&peer_id);
                }
            }

            HubCommand::Message { peer_id, message } => {
                self.handle_message(peer_id, message).await;
            }

            HubCommand::Malformed { peer_id, reason } => {
                if self.registry.contains(&peer_id) {
                    self.reject(peer_id, "frame", SignalError::MalformedMessage(reason))
                        .await;
                }
            }

            HubCommand::Disconnect { peer_id } => {
                self.handle_disconnect(peer_id).await;
            }

            HubCommand::Inspect { peer_id, reply } => {
                let _ = reply.send(self.registry.get(&peer_id).cloned());
            }

            HubCommand::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
        }
    }

    async fn handle_message(&mut self, peer_id: PeerId, message: ClientMessage) {
        // Disconnect already processed; whatever was in flight is stale.
        if !self.registry.contains(&peer_id) {
            debug!("Dropping '{}' from unknown peer {}", message.kind(), peer_id);
            return;
        }

        let kind = message.kind();
        let result = match message {
            ClientMessage::Register {
                role,
                camera_id,
                user_id,
            } => {
                self.register(peer_id, role, PeerMetadata { camera_id, user_id })
                    .await
            }
            ClientMessage::Next => {
                self.next(peer_id).await;
                Ok(())
            }
            ClientMessage::Leave => {
                self.leave(peer_id).await;
                Ok(())
            }
            ClientMessage::Offer(payload) => self.relay(peer_id, RelayKind::Offer, payload).await,
            ClientMessage::Answer(payload) => self.relay(peer_id, RelayKind::Answer, payload).await,
            ClientMessage::IceCandidate(payload) => {
                self.relay(peer_id, RelayKind::IceCandidate, payload).await
            }
            ClientMessage::ListCameras => {
                let cameras = self.directory.list_cameras();
                self.signaling
                    .send(peer_id, ServerMessage::CameraList { cameras })
                    .await;
                Ok(())
            }
            ClientMessage::Signal { room_id, data } => self.signal(peer_id, room_id, data).await,
            ClientMessage::Ping => {
                self.signaling.send(peer_id, ServerMessage::Pong).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.reject(peer_id, kind, e).await;
        }
    }

    async fn reject(&mut self, peer_id: PeerId, kind: &str, e: SignalError) {
        if e.is_internal() {
            error!("Internal fault on '{}' from {}: {}", kind, peer_id, e);
        } else {
            warn!("Rejected '{}' from {}: {}", kind, peer_id, e);
        }
        self.signaling
            .send(peer_id, ServerMessage::error(e.to_string()))
            .await;
    }

    async fn register(
        &mut self,
        peer_id: PeerId,
        role: RegisterRole,
        metadata: PeerMetadata,
    ) -> Result<(), SignalError> {
        let camera_id = match role {
            RegisterRole::Camera => Some(
                metadata
                    .camera_id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        SignalError::MalformedMessage(
                            "camera registration requires camera_id".into(),
                        )
                    })?,
            ),
            RegisterRole::Viewer => None,
        };

        // Directory peers never sit in the roulette queue or a roulette room.
        self.leave(peer_id).await;
        self.directory.unregister(&peer_id);

        let role = match role {
            RegisterRole::Camera => Role::Camera,
            RegisterRole::Viewer => Role::Viewer,
        };
        self.registry.set_role(&peer_id, role, metadata);

        match camera_id {
            Some(camera_id) => {
                if let Some(previous) = self.directory.register_camera(camera_id.clone(), peer_id) {
                    info!(
                        "Camera '{}' re-registered by {} (replacing {})",
                        camera_id, peer_id, previous
                    );
                }
                info!("Peer {} registered as camera '{}'", peer_id, camera_id);
            }
            None => info!("Peer {} registered as viewer", peer_id),
        }

        self.signaling
            .send(peer_id, ServerMessage::Registered { peer_id })
            .await;
        Ok(())
    }

    async fn next(&mut self, peer_id: PeerId) {
        if self.queue.contains(&peer_id) {
            self.signaling.send(peer_id, ServerMessage::Waiting).await;
            return;
        }

        if let Some(room_id) = self.room_of(&peer_id) {
            self.release_room(room_id, Some(peer_id)).await;
        }

        if self.directory.unregister(&peer_id) > 0 {
            info!("Camera {} left the directory for roulette", peer_id);
        }
        self.registry
            .set_role(&peer_id, Role::RouletteSeeker, PeerMetadata::default());

        self.enqueue(peer_id).await;
    }

    async fn leave(&mut self, peer_id: PeerId) {
        if self.queue.leave(&peer_id) {
            self.registry.set_idle(&peer_id);
            debug!("Peer {} left the queue", peer_id);
        }

        if let Some(room_id) = self.room_of(&peer_id) {
            self.release_room(room_id, Some(peer_id)).await;
        }
    }

    async fn enqueue(&mut self, peer_id: PeerId) {
        let outcome = self.queue.enqueue(peer_id);
        self.place(peer_id, outcome).await;
    }

    async fn place(&mut self, peer_id: PeerId, outcome: Enqueued) {
        match outcome {
            Enqueued::Waiting | Enqueued::AlreadyWaiting => {
                self.registry.set_waiting(&peer_id);
                debug!("Peer {} is waiting for a partner", peer_id);
                self.signaling.send(peer_id, ServerMessage::Waiting).await;
            }
            Enqueued::Paired { caller, callee } => self.open_room(caller, callee).await,
        }
    }

    async fn open_room(&mut self, caller: PeerId, callee: PeerId) {
        match self.rooms.open(&mut self.registry, caller, callee) {
            Ok(room_id) => {
                self.signaling
                    .send(
                        caller,
                        ServerMessage::Match {
                            room_id,
                            role: CallRole::Caller,
                        },
                    )
                    .await;
                self.signaling
                    .send(
                        callee,
                        ServerMessage::Match {
                            room_id,
                            role: CallRole::Callee,
                        },
                    )
                    .await;
            }
            Err(e) => {
                error!("Failed to open room for {} and {}: {}", caller, callee, e);
                self.recover_from_fault([caller, callee], e).await;
            }
        }
    }

    /// Tears down whatever room either peer is stuck in and leaves both idle.
    async fn recover_from_fault(&mut self, pair: [PeerId; 2], fault: SignalError) {
        for peer_id in pair {
            if let Some(room_id) = self.room_of(&peer_id) {
                warn!("Force-closing room {} held by {}", room_id, peer_id);
                self.close_room(room_id, Some(peer_id)).await;
            }
            self.queue.leave(&peer_id);
            self.registry.set_idle(&peer_id);

            if self.registry.contains(&peer_id) {
                self.signaling
                    .send(peer_id, ServerMessage::error(fault.to_string()))
                    .await;
            }
        }
    }

    /// Closes the room and tells every survivor its partner is gone.
    async fn close_room(&mut self, room_id: RoomId, departing: Option<PeerId>) -> Vec<PeerId> {
        let Some(closed) = self.rooms.close(&mut self.registry, &room_id, departing) else {
            return Vec::new();
        };

        for survivor in &closed.survivors {
            self.signaling
                .send(*survivor, ServerMessage::PartnerLeft)
                .await;
        }

        closed.survivors
    }

    async fn release_room(&mut self, room_id: RoomId, departing: Option<PeerId>) {
        let survivors = self.close_room(room_id, departing).await;

        if self.auto_requeue {
            for survivor in survivors {
                debug!("Requeueing {} after its partner left", survivor);
                let outcome = self.queue.requeue(survivor);
                self.place(survivor, outcome).await;
            }
        }
    }

    async fn relay(
        &mut self,
        from: PeerId,
        kind: RelayKind,
        payload: RelayPayload,
    ) -> Result<(), SignalError> {
        let dest = Relay::new(&self.registry, &self.rooms, &self.directory)
            .resolve(&from, payload.target_peer_id.as_deref())?;

        debug!("Forwarded {} from {} to {}", kind.as_str(), from, dest);
        self.signaling
            .send(dest, ServerMessage::relayed(kind, payload.tagged(from)))
            .await;
        Ok(())
    }

    async fn signal(&mut self, from: PeerId, room_id: RoomId, data: Value) -> Result<(), SignalError> {
        let dest = Relay::new(&self.registry, &self.rooms, &self.directory)
            .resolve_room(&from, &room_id)?;

        debug!("Forwarded signal in room {} from {} to {}", room_id, from, dest);
        self.signaling
            .send(
                dest,
                ServerMessage::Signal {
                    room_id,
                    data,
                    from_peer_id: from,
                },
            )
            .await;
        Ok(())
    }

    async fn handle_disconnect(&mut self, peer_id: PeerId) {
        let Some(peer) = self.registry.remove(&peer_id) else {
            debug!("Peer {} already removed", peer_id);
            return;
        };

        self.queue.leave(&peer_id);
        let cameras = self.directory.unregister(&peer_id);

        if let Some(room_id) = peer.room_id {
            self.release_room(room_id, Some(peer_id)).await;
        }

        info!(
            "Peer {} disconnected (role {:?}, cameras dropped: {}, connected for {:?})",
            peer_id,
            peer.role,
            cameras,
            peer.connected_at.elapsed()
        );
    }

    fn room_of(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.registry.get(peer_id).and_then(|peer| peer.room_id)
    }

    fn stats(&self) -> HubStats {
        HubStats {
            peers: self.registry.len(),
            waiting: self.queue.len(),
            rooms: self.rooms.len(),
            cameras: self.directory.len(),
        }
    }
}
