//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{ClientEvent, ConnectedNotice, ServerEvent},
    ui::state::AppState,
};

use super::event::{dispatch, reply};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued messages to the WebSocket sink.
///
/// Every message addressed to this connection (direct replies and room
/// fan-out alike) goes through the same channel, so the client sees them in
/// the order they were queued.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Processes this connection's inbound frames one at a time.
fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => handle_text(&state, &connection_id, text.as_str()).await,
                Message::Binary(_) => {
                    tracing::warn!("Binary frame from '{}' ignored", connection_id);
                    let notice =
                        ServerEvent::RelayError("Binary frames are not supported".to_string());
                    if let Err(e) = reply(&state, &connection_id, &notice).await {
                        tracing::warn!("Failed to answer '{}': {}", connection_id, e);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    })
}

async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
            let notice = ServerEvent::RelayError(format!("Malformed frame: {}", e));
            if let Err(e) = reply(state, connection_id, &notice).await {
                tracing::warn!("Failed to answer '{}': {}", connection_id, e);
            }
            return;
        }
    };

    let name = event.name();
    tracing::debug!("Received '{}' from '{}'", name, connection_id);

    if let Err(e) = dispatch(state, connection_id, event).await {
        tracing::warn!("Failed to handle '{}' from '{}': {}", name, connection_id, e);
        if let Err(e) = reply(state, connection_id, &e.reply()).await {
            tracing::warn!("Failed to answer '{}': {}", connection_id, e);
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let connection_id = match state.connect_client_usecase.execute(tx).await {
        Ok((connection_id, connected_at)) => {
            tracing::info!(
                "Client '{}' connected at {}",
                connection_id,
                connected_at.value()
            );
            connection_id
        }
        Err(e) => {
            tracing::error!("Failed to accept connection: {}", e);
            return;
        }
    };

    let notice = ServerEvent::Connected(ConnectedNotice {
        connection_id: connection_id.to_string(),
    });
    if let Err(e) = reply(&state, &connection_id, &notice).await {
        tracing::warn!("Failed to greet '{}': {}", connection_id, e);
    }

    let (sender, receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receive_loop(receiver, state.clone(), connection_id.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let departures = state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await;
    tracing::info!(
        "Client '{}' disconnected, left {} room(s)",
        connection_id,
        departures.len()
    );
}
