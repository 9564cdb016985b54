//! WebSocket handler for live guessing sessions
//!
//! Inbound binary frames carry raw audio; outbound text frames carry one
//! JSON record per newly recognized country. Each connection gets its own
//! session with a producer/consumer task pair; disconnect tears the pair
//! down cooperatively and never affects other sessions.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;

use super::AppState;
use crate::session::Session;

/// Outgoing WebSocket message to the client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsOutgoing {
    /// A country was recognized for the first time this session
    Guess { country: String },
}

/// Build the WebSocket router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

/// Handle the WebSocket upgrade request
async fn ws_upgrade(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one WebSocket connection end to end
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Recognized countries flow from the session's matcher to the send task
    let (tx, mut rx) = mpsc::channel::<String>(32);
    let session = Session::spawn(
        Arc::clone(&state.index),
        Arc::clone(&state.transcriber),
        tx,
        &state.engine,
    );

    tracing::info!("websocket connected");

    let send_task = tokio::spawn(async move {
        while let Some(country) = rx.recv().await {
            let event = WsOutgoing::Guess { country };
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!(error = %e, "failed to serialize guess event"),
            }
        }
    });

    // Inbound loop: accumulate audio until the client goes away
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Binary(data) => session.push_audio(&data).await,
            Message::Close(_) => {
                tracing::info!("websocket closed by client");
                break;
            }
            _ => {}
        }
    }

    // Normal teardown path: cancel both tasks, wait for them, then the send
    // task drains and exits once the matcher's sender is gone.
    session.shutdown().await;
    if let Err(e) = send_task.await {
        tracing::warn!(error = %e, "send task did not shut down cleanly");
    }

    tracing::info!("websocket disconnected");
}
