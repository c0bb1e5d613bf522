use std::collections::HashMap;

use thiserror::Error;

use crate::relay::{ChatMessage, ClientEvent, DirectMessage, JoinRoom, PrivateMessage, ServerEvent};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("username and room are required")]
    MissingFields,
}

/// Whether an entry was appended on send or arrived through the relay.
/// Local entries are never confirmed or rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub origin: Origin,
    pub body: T,
}

#[derive(Debug)]
pub struct ViewState {
    username: String,
    room: String,
    messages: Vec<Entry<ChatMessage>>,
    direct: HashMap<String, Vec<Entry<DirectMessage>>>,
    users: Vec<String>,
    peer: Option<String>,
}

impl ViewState {
    pub fn new(username: &str, room: &str) -> Result<Self, ViewError> {
        if username.trim().is_empty() || room.trim().is_empty() {
            return Err(ViewError::MissingFields);
        }

        Ok(Self {
            username: username.to_owned(),
            room: room.to_owned(),
            messages: Vec::new(),
            direct: HashMap::new(),
            users: Vec::new(),
            peer: None,
        })
    }

    /// The announcement to send once the socket is open, and again after any reconnect.
    pub fn join_event(&self) -> ClientEvent {
        ClientEvent::Join(JoinRoom {
            room: self.room.clone(),
            username: self.username.clone(),
        })
    }

    pub fn apply(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::RoomUsers(users) => {
                self.users = users;
                if self.peer.as_ref().is_some_and(|peer| !self.users.contains(peer)) {
                    self.peer = None;
                }
            }
            ServerEvent::ReceiveMessage(message) => {
                self.messages.push(Entry { origin: Origin::Remote, body: message });
            }
            ServerEvent::ReceivePrivateMessage(message) => {
                self.direct
                    .entry(message.author.clone())
                    .or_default()
                    .push(Entry { origin: Origin::Remote, body: message });
            }
        }
    }

    pub fn send_room_message(&mut self, text: &str) -> Option<ClientEvent> {
        if text.trim().is_empty() {
            return None;
        }

        let message = ChatMessage {
            room: self.room.clone(),
            author: self.username.clone(),
            message: text.to_owned(),
            timestamp: crate::timestamp(),
        };
        self.messages.push(Entry { origin: Origin::Local, body: message.clone() });

        Some(ClientEvent::SendMessage(message))
    }

    pub fn send_direct_message(&mut self, text: &str) -> Option<ClientEvent> {
        let peer = self.peer.clone()?;
        if text.trim().is_empty() {
            return None;
        }

        let timestamp = crate::timestamp();
        self.direct.entry(peer.clone()).or_default().push(Entry {
            origin: Origin::Local,
            body: DirectMessage {
                author: self.username.clone(),
                message: text.to_owned(),
                timestamp: timestamp.clone(),
            },
        });

        Some(ClientEvent::SendPrivateMessage(PrivateMessage {
            to_username: peer,
            from_username: self.username.clone(),
            message: text.to_owned(),
            timestamp,
        }))
    }

    /// Picks a direct-message peer from the current member list.
    pub fn select_peer(&mut self, username: &str) -> bool {
        if username == self.username || !self.users.iter().any(|user| user == username) {
            return false;
        }
        self.peer = Some(username.to_owned());
        true
    }

    pub fn clear_peer(&mut self) {
        self.peer = None;
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn messages(&self) -> &[Entry<ChatMessage>] {
        &self.messages
    }

    pub fn direct_messages(&self, peer: &str) -> &[Entry<DirectMessage>] {
        self.direct.get(peer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }
}
