use axum::{debug_handler, extract::{ws::{Message, WebSocket}, State, WebSocketUpgrade}, response::IntoResponse};
use futures_util::{SinkExt, StreamExt};

use super::{events::ClientEvent, Relay};

#[debug_handler(state = crate::AppState)]
pub async fn relay_ws(
    State(relay): State<Relay>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |stream| serve(relay, stream))
}

async fn serve(relay: Relay, stream: WebSocket) {
    let (id, mut rx) = relay.connect().await;
    let (mut sender, mut receiver) = stream.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!("could not encode {event:?}: {err}");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let inbound = relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let msg = match msg {
                Message::Close(_) => break,
                Message::Ping(_) | Message::Pong(_) => continue,
                msg => msg,
            };

            let Ok(event) = serde_json::from_slice::<ClientEvent>(&msg.into_data()) else {
                tracing::debug!("connection {id} sent an unreadable frame");
                continue;
            };

            inbound.dispatch(id, event).await;
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    };

    relay.disconnect(id).await;
}
