use super::{JoinOutcome, Room};
use crate::game::input::parse_direction;
use crate::game::registry::{Lookup, SessionRegistry};
use crate::game::types::{ClientId, Point};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::shared::names::sanitize_room_name;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Addressable half of a connection: its id and outbound queue.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    sender: UnboundedSender<ServerMessage>,
}

impl ClientHandle {
    pub fn new(id: ClientId, sender: UnboundedSender<ServerMessage>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queues a message. A closed queue means the socket is already going
    /// away and its own task runs the disconnect path.
    pub fn send(&self, message: ServerMessage) {
        let _ = self.sender.send(message);
    }
}

/// Per-connection state. The room is only a lookup handle: membership is
/// re-checked inside the room on every action.
pub struct ClientSession {
    handle: ClientHandle,
    registry: Arc<SessionRegistry>,
    room: Option<Arc<Room>>,
}

impl ClientSession {
    pub fn connect(registry: Arc<SessionRegistry>, sender: UnboundedSender<ServerMessage>) -> Self {
        let id = Uuid::new_v4().to_string();
        let handle = ClientHandle::new(id.clone(), sender);
        handle.send(ServerMessage::Connected { id });
        tracing::info!(client_id = handle.id(), "connected");
        Self {
            handle,
            registry,
            room: None,
        }
    }

    pub fn id(&self) -> &str {
        self.handle.id()
    }

    pub fn room_name(&self) -> Option<&str> {
        self.room.as_deref().map(Room::name)
    }

    pub async fn handle_message(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::JoinRoom(name) => self.join_room(&name).await,
            ClientMessage::LeaveRoom => self.leave_room().await,
            ClientMessage::StartButtonClick => self.start_button_click().await,
            ClientMessage::DirectionalInput(input) => self.direction_input(input).await,
        }
    }

    pub async fn join_room(&mut self, requested: &str) {
        let Some(name) = sanitize_room_name(requested) else {
            self.handle.send(ServerMessage::JoinRoomCallback(false));
            return;
        };
        if let Some(room) = self.room.take() {
            // a torn-down room already released this client
            if room.is_member(self.handle.id()).await {
                room.leave(&self.registry, &self.handle).await;
            }
        }

        loop {
            match self.registry.find_or_create(&name, &self.handle) {
                Lookup::Created(room) => {
                    room.welcome_creator(&self.handle).await;
                    self.room = Some(room);
                    return;
                }
                Lookup::Existing(room) => match room.try_join(&self.handle).await {
                    JoinOutcome::Joined => {
                        self.room = Some(room);
                        return;
                    }
                    JoinOutcome::Full => {
                        self.handle.send(ServerMessage::JoinRoomCallback(false));
                        return;
                    }
                    JoinOutcome::Closed => continue,
                },
            }
        }
    }

    pub async fn leave_room(&mut self) {
        match self.room.take() {
            Some(room) => room.leave(&self.registry, &self.handle).await,
            None => self.handle.send(ServerMessage::LeaveRoomCallback),
        }
    }

    pub async fn start_button_click(&mut self) {
        let Some(room) = self.room.clone() else { return };
        if !room.toggle_ready(self.handle.id()).await {
            self.room = None;
        }
    }

    pub async fn direction_input(&mut self, input: Point) {
        let Some(direction) = parse_direction(input) else { return };
        let Some(room) = self.room.clone() else { return };
        if !room.steer(self.handle.id(), direction).await {
            self.room = None;
        }
    }

    pub async fn disconnect(mut self) {
        tracing::info!(client_id = self.handle.id(), "disconnected");
        self.leave_room().await;
    }
}
