use crate::auth::Credentials;
use crate::error::SignalingError;
use crate::hub::HubHandle;
use crate::transport::{AppState, WsSink};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beacon_core::{RoomId, SignalMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// `GET /ws`: connection in the global room.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(credentials): Query<Credentials>,
    State(state): State<AppState>,
) -> Response {
    upgrade(ws, None, credentials, state).await
}

/// `GET /ws/{room}`: connection in a named room.
pub async fn ws_room_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    Query(credentials): Query<Credentials>,
    State(state): State<AppState>,
) -> Response {
    upgrade(ws, Some(RoomId::from(room)), credentials, state).await
}

async fn upgrade(
    ws: WebSocketUpgrade,
    room: Option<RoomId>,
    credentials: Credentials,
    state: AppState,
) -> Response {
    if let Err(e) = state.hub.authenticate(&credentials).await {
        return (StatusCode::UNAUTHORIZED, e.to_string()).into_response();
    }

    // Cheap early refusal; the hub makes the binding check.
    let registry = state.hub.registry();
    if registry.is_full() {
        let err = SignalingError::RegistryFull(registry.capacity());
        warn!("Refusing WebSocket upgrade: {}", err);
        return (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response();
    }

    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, room, hub))
}

async fn handle_socket(socket: WebSocket, room: Option<RoomId>, hub: HubHandle) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let lease = match hub.connect(room, Box::new(WsSink::new(tx))).await {
        Ok(lease) => lease,
        Err(e) => {
            warn!("Refusing WebSocket connection: {}", e);
            let msg = SignalMessage::Error {
                message: e.to_string(),
            };
            if let Ok(json) = msg.to_json() {
                let _ = sender.send(Message::Text(json.into())).await;
            }
            let _ = sender.close().await;
            return;
        }
    };

    let peer_id = lease.peer_id();
    info!("New WebSocket connection: {}", peer_id);

    // Ends once the registry drops the sink, i.e. after teardown.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    let mut recv_task = tokio::spawn({
        let hub = hub.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => hub.handle_frame(peer_id, text.as_str().as_bytes()).await,
                    Message::Binary(data) => hub.handle_frame(peer_id, &data).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    info!("WebSocket disconnected: {}", peer_id);
    drop(lease);
}
