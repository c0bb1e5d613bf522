use std::{collections::HashMap, sync::Arc};

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use super::events::{ChatMessage, ClientEvent, DirectMessage, PrivateMessage, ServerEvent};

pub type ConnectionId = Uuid;

/// Who a connection claimed to be when it joined. Replaced whole on re-join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room: String,
    pub username: String,
}

struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<ServerEvent>,
    binding: Option<Arc<Binding>>,
}

impl Connection {
    fn in_room(&self, room: &str) -> bool {
        self.binding.as_ref().is_some_and(|binding| binding.room == room)
    }

    fn is_user(&self, username: &str) -> bool {
        self.binding.as_ref().is_some_and(|binding| binding.username == username)
    }

    fn emit(&self, event: ServerEvent) {
        // receiver gone means the socket is already closing
        let _ = self.tx.send(event);
    }
}

#[derive(Default)]
struct Registry {
    /// Room name to member usernames, in join order.
    rooms: HashMap<String, Vec<String>>,
    /// Live connections, in connect order.
    connections: Vec<Connection>,
}

impl Registry {
    fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|conn| conn.id == id)
    }

    fn emit_room_users(&self, room: &str) {
        let users = self.rooms.get(room).cloned().unwrap_or_default();
        for conn in self.connections.iter().filter(|conn| conn.in_room(room)) {
            conn.emit(ServerEvent::RoomUsers(users.clone()));
        }
    }

    /// Drops the username from the room even if another connection still
    /// claims it; that connection stays bound and keeps receiving.
    fn leave(&mut self, binding: &Binding) {
        if let Some(users) = self.rooms.get_mut(&binding.room) {
            users.retain(|user| user != &binding.username);
            if users.is_empty() {
                self.rooms.remove(&binding.room);
            }
        }

        tracing::info!("{} left {}", binding.username, binding.room);
        self.emit_room_users(&binding.room);
    }
}

/// Room membership and fan-out for every live WebSocket.
///
/// Cheap to clone; all clones share one registry. Each operation holds the
/// registry lock from start to finish, so events are applied one at a time.
#[derive(Clone, Default)]
pub struct Relay {
    registry: Arc<Mutex<Registry>>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live connection. Events for it arrive on the returned receiver.
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = Uuid::now_v7();
        let (tx, rx) = mpsc::unbounded_channel();

        self.registry.lock().await.connections.push(Connection { id, tx, binding: None });
        tracing::debug!("connection {id} opened");

        (id, rx)
    }

    pub async fn dispatch(&self, id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::Join(join) => self.join(id, join.room, join.username).await,
            ClientEvent::SendMessage(message) => self.broadcast_room_message(id, message).await,
            ClientEvent::SendPrivateMessage(message) => {
                self.send_direct(message).await;
            }
        }
    }

    /// Binds `id` to `(room, username)` and sends the room's member list to
    /// everyone in it. A connection already bound elsewhere leaves that room first.
    pub async fn join(&self, id: ConnectionId, room: String, username: String) {
        if room.trim().is_empty() || username.trim().is_empty() {
            tracing::debug!("connection {id} sent a join without room or username");
            return;
        }

        let mut registry = self.registry.lock().await;
        let binding = Arc::new(Binding { room, username });

        let Some(conn) = registry.connection_mut(id) else {
            return;
        };
        let previous = conn.binding.replace(binding.clone());

        if let Some(previous) = previous.filter(|previous| **previous != *binding) {
            registry.leave(&previous);
        }

        let users = registry.rooms.entry(binding.room.clone()).or_default();
        if !users.contains(&binding.username) {
            users.push(binding.username.clone());
        }

        tracing::info!("{} ({id}) joined {}", binding.username, binding.room);
        registry.emit_room_users(&binding.room);
    }

    /// Relays `message` to every connection in `message.room` except the sender.
    pub async fn broadcast_room_message(&self, from: ConnectionId, message: ChatMessage) {
        let registry = self.registry.lock().await;

        tracing::debug!("message in {} from {}", message.room, message.author);
        for conn in registry
            .connections
            .iter()
            .filter(|conn| conn.id != from && conn.in_room(&message.room))
        {
            conn.emit(ServerEvent::ReceiveMessage(message.clone()));
        }
    }

    /// Delivers to the first live connection joined as `to_username`.
    /// Returns whether anyone received it; the sender is never told.
    pub async fn send_direct(&self, message: PrivateMessage) -> bool {
        let registry = self.registry.lock().await;

        let Some(conn) = registry.connections.iter().find(|conn| conn.is_user(&message.to_username)) else {
            tracing::debug!(
                "dropped direct message from {} to offline {}",
                message.from_username,
                message.to_username
            );
            return false;
        };

        conn.emit(ServerEvent::ReceivePrivateMessage(DirectMessage {
            author: message.from_username,
            message: message.message,
            timestamp: crate::timestamp(),
        }));
        true
    }

    pub async fn disconnect(&self, id: ConnectionId) {
        let mut registry = self.registry.lock().await;

        let Some(index) = registry.connections.iter().position(|conn| conn.id == id) else {
            return;
        };
        let conn = registry.connections.remove(index);
        tracing::debug!("connection {id} closed");

        if let Some(binding) = conn.binding {
            registry.leave(&binding);
        }
    }

    pub async fn room_users(&self, room: &str) -> Vec<String> {
        self.registry
            .lock()
            .await
            .rooms
            .get(room)
            .cloned()
            .unwrap_or_default()
    }
}
