//! WebSocket broadcast endpoint.
//!
//! Every connected client receives a SYSTEM greeting followed by every
//! event published on the bus after it connected, one JSON text frame per
//! event, in publish order. Each connection holds its own broadcast
//! receiver, so a stalled client never delays the others; dropping the
//! receiver on disconnect removes the subscription.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::AppState;
use acp_core::Event;
use acp_dispatch::EventBus;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let bus = state.bus.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, bus))
}

async fn handle_socket(mut socket: WebSocket, bus: EventBus) {
    info!("Stream client connected");

    // Subscribe before greeting so nothing published in between is missed.
    let mut rx = bus.subscribe();

    let greeting = Event::greeting("Connected to ACP event stream");
    if send_event(&mut socket, &greeting).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Stream client lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.next() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    break;
                }
                // Inbound frames carry no meaning on this endpoint.
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Stream client disconnected");
    // rx drops here, removing this connection's subscription.
}

async fn send_event(socket: &mut WebSocket, event: &Event) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}
