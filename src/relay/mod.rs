pub mod events;
mod registry;
mod ws;

use axum::{routing::get, Router};

use crate::AppState;

pub use events::{ChatMessage, ClientEvent, DirectMessage, JoinRoom, PrivateMessage, ServerEvent};
pub use registry::{Binding, ConnectionId, Relay};
pub use ws::relay_ws;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::relay_ws))
}
