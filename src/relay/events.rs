//! Named events carried over the WebSocket, one JSON object per text frame:
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoom {
    pub room: String,
    pub username: String,
}

/// A room message, relayed as-is to the other members of `room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub room: String,
    pub author: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessage {
    pub to_username: String,
    pub from_username: String,
    pub message: String,
    pub timestamp: String,
}

/// What the recipient of a [`PrivateMessage`] sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub author: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    #[serde(alias = "join_room")]
    Join(JoinRoom),
    SendMessage(ChatMessage),
    SendPrivateMessage(PrivateMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    RoomUsers(Vec<String>),
    ReceiveMessage(ChatMessage),
    ReceivePrivateMessage(DirectMessage),
}
