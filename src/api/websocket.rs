//! WebSocket push channel

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::task_tracker::TaskTrackerToken;

use crate::api::AppState;
use crate::connections::ConnectionId;
use crate::dispatch::{ClientMessage, Command};

/// How long a close frame may take to flush before the socket is dropped.
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Handles WebSocket upgrade requests on the push endpoint
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(slot) = reserve_socket(&state) else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    ws.on_upgrade(move |socket| async move {
        handle_socket(socket, state).await;
        drop(slot);
    })
}

/// Hold a place in the socket tracker for one upgrade, or `None` once the
/// bridge is stopping.
///
/// The slot is taken before the shutdown check: `stop` cancels before it
/// waits, so it either sees the slot or the upgrade is refused.
fn reserve_socket(state: &AppState) -> Option<TaskTrackerToken> {
    let slot = state.tasks.token();
    if state.shutdown.is_cancelled() {
        return None;
    }
    Some(slot)
}

/// Handles an established push connection until either side closes it
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (connection, mut outbound) = state
        .connections
        .open(state.config.server.outbound_queue_capacity);
    let id = connection.id();

    // close_all may have run between the upgrade and open
    if state.shutdown.is_cancelled() {
        connection.close();
    }

    tracing::info!(connection_id = id, "Push connection opened");
    metrics::counter!("bridge_connections_opened_total").increment(1);

    let (mut sender, mut receiver) = socket.split();

    let send_loop = async {
        loop {
            tokio::select! {
                _ = connection.closed() => break,
                message = outbound.recv() => {
                    let Some(text) = message else { break };
                    tokio::select! {
                        result = sender.send(Message::Text(text.to_string())) => {
                            if result.is_err() {
                                return;
                            }
                        }
                        _ = connection.closed() => break,
                    }
                }
            }
        }

        let frame = CloseFrame {
            code: close_code::AWAY,
            reason: "bridge closed connection".into(),
        };
        let _ = tokio::time::timeout(CLOSE_TIMEOUT, sender.send(Message::Close(Some(frame)))).await;
    };

    let recv_loop = async {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    handle_client_message(id, &text);
                }
                Message::Close(_) => break,
                // axum answers pings itself
                _ => {}
            }
        }
    };

    tokio::select! {
        _ = send_loop => {},
        _ = recv_loop => {},
    }

    if state.connections.remove(id).is_some() {
        tracing::info!(connection_id = id, "Push connection closed by client");
    } else {
        tracing::debug!(connection_id = id, "Push connection closed");
    }
}

/// Parse and log one message from a client.
///
/// Commands are acknowledged in the log only; unknown or malformed messages
/// are ignored.
pub fn handle_client_message(connection_id: ConnectionId, text: &str) -> Option<Command> {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::Command { command }) => {
            tracing::info!(connection_id, command = ?command, "Client command received");
            Some(command)
        }
        Err(e) => {
            tracing::debug!(connection_id, error = %e, "Ignoring client message");
            None
        }
    }
}
