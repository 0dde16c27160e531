use crate::game::registry::SessionRegistry;
use crate::game::room::ClientSession;
use crate::protocol::{decode_client_message, encode_server_message, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn handle_socket(socket: WebSocket, registry: Arc<SessionRegistry>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let mut session = ClientSession::connect(registry, tx);

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let payload = match encode_server_message(&message) {
                Ok(payload) => payload,
                Err(error) => {
                    tracing::warn!(%error, "failed to encode outbound message");
                    continue;
                }
            };
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => match decode_client_message(&text) {
                Some(message) => session.handle_message(message).await,
                None => {
                    tracing::debug!(
                        client_id = session.id(),
                        room = session.room_name(),
                        "dropped malformed frame"
                    );
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    session.disconnect().await;
    send_task.abort();
}
