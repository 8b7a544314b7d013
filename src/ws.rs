use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::hub::{ClientEvent, Hub};

// voice notes ride the same socket, so frames can get big
const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

#[debug_handler(state = crate::AppState)]
pub async fn chat_ws(State(hub): State<Arc<Hub>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(async move |socket| handle_socket(hub, socket).await)
}

/// One task writes hub events out, the upgrade task reads client events in.
/// Whatever ends the read loop (close frame, protocol error, dropped TCP)
/// funnels into the same disconnect path.
async fn handle_socket(hub: Arc<Hub>, socket: WebSocket) {
    let id = Uuid::now_v7();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    hub.connect(id, tx);

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(text.into()).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        let Ok(event) = serde_json::from_slice::<ClientEvent>(&msg.into_data()) else {
            debug!(%id, "unparseable frame skipped");
            continue;
        };
        hub.handle(id, event);
    }

    hub.disconnect(id);
    send_task.abort();
}
