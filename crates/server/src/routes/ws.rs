//! WebSocket endpoint for live plots.
//!
//! # Endpoints
//!
//! - `GET /{id}/ws` - WebSocket upgrade attaching to session `id`
//!
//! # Protocol
//!
//! Client messages are JSON [`InteractionEvent`](render::InteractionEvent)s.
//! `supports_binary` is consumed here; everything else goes to the session's
//! render manager. Updates from the manager arrive on this connection's sink
//! and are framed per [`encode_update`].

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use render::{RenderError, update_channel};
use tracing::{debug, warn};
use types::SessionId;

use crate::bridge::{Connection, Inbound, encode_update};
use crate::error::{AppError, AppResult};
use crate::registry::Detached;
use crate::state::ServerState;

/// WebSocket upgrade handler: `GET /{id}/ws`
///
/// Unknown sessions are rejected with 404 before upgrading.
pub async fn ws_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let session: SessionId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("/{}/ws", id)))?;
    if !state.registry.contains(session) {
        return Err(AppError::UnknownSession(session));
    }

    match ws {
        Ok(ws) => Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session))),
        Err(rejection) => Ok(rejection.into_response()),
    }
}

/// Drive one connection until either side goes away.
async fn handle_socket(socket: WebSocket, state: ServerState, session: SessionId) {
    let mut conn = Connection::new(state.registry.allocate_connection(), session);
    let handle = match conn.open(&state.registry) {
        Ok(handle) => handle,
        Err(e) => {
            // Last viewer of a session left between the check and the upgrade.
            debug!(%session, "attach failed: {}", e);
            return;
        }
    };
    state.metrics.ws_connect();

    let (mut sender, mut receiver) = socket.split();
    let (sink, mut updates) = update_channel();
    handle.manager.add_sink(conn.id(), sink);

    // Forward manager updates in emission order. Framing follows the binary
    // flag at send time, so a queued blob honors a later `supports_binary`.
    let binary = conn.binary_flag();
    let mut send_task = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            let frame = encode_update(update, binary.load(Ordering::Relaxed));
            if sender.send(frame).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    let recv = async {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match conn.on_text(text.as_str()) {
                    Inbound::Handled => {}
                    Inbound::Forward(event) => {
                        let manager = Arc::clone(&handle.manager);
                        let kind = event.kind.clone();
                        match tokio::task::spawn_blocking(move || manager.handle_event(&event))
                            .await
                        {
                            Ok(Ok(())) => {}
                            Ok(Err(e @ RenderError::BadEvent { .. })) => {
                                state.metrics.malformed_message();
                                debug!(connection = %conn.id(), "dropped event: {}", e);
                            }
                            Ok(Err(e)) => {
                                warn!(connection = %conn.id(), %kind, "render failed: {}", e);
                            }
                            Err(e) => {
                                warn!(connection = %conn.id(), %kind, "render task failed: {}", e);
                                break;
                            }
                        }
                    }
                    Inbound::Malformed(reason) => {
                        state.metrics.malformed_message();
                        debug!(connection = %conn.id(), "dropped malformed message: {}", reason);
                    }
                    Inbound::Closed => break,
                },
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    debug!(connection = %conn.id(), "WebSocket error: {}", e);
                    break;
                }
                _ => {} // Ignore ping/pong/binary
            }
        }
    };

    tokio::select! {
        _ = &mut send_task => {},
        _ = recv => {},
    }
    send_task.abort();

    handle.manager.remove_sink(conn.id());
    match conn.close(&state.registry) {
        Some(Ok(Detached::Destroyed)) => debug!(%session, "session destroyed"),
        Some(Ok(Detached::StillViewed(n))) => debug!(%session, viewers = n, "viewer left"),
        Some(Err(e)) => warn!(%session, "detach failed: {}", e),
        None => {}
    }
    state.metrics.ws_disconnect();
}
