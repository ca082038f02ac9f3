//! Protocol bridge between one browser connection and its session.
//!
//! ```text
//! Browser                      Connection                    RenderManager
//!    │── text frame ──────────────▶│ on_text                       │
//!    │                             │── Forward(event) ────────────▶│ handle_event
//!    │◀── text / binary frame ─────│◀── RenderUpdate (sink) ───────│
//! ```
//!
//! A [`Connection`] walks `Connecting -> Open -> Closed`. Opening attaches it
//! to the registry, closing detaches it; `Closed` is terminal. Outbound
//! updates are framed by [`encode_update`] according to the connection's
//! binary-frame flag, which the send task reads through a shared
//! [`AtomicBool`] so inbound handling never waits on outbound delivery.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::ws::Message;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use render::{InteractionEvent, RenderUpdate, SUPPORTS_BINARY};
use tracing::{debug, trace};
use types::{ConnectionId, SessionId};

use crate::registry::{Detached, RegistryError, SessionHandle, SessionRegistry};

/// Prefix of the text-frame fallback for image blobs.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Lifecycle of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// What to do with one inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Consumed by the bridge itself.
    Handled,
    /// Hand to the render manager.
    Forward(InteractionEvent),
    /// Not a valid event; drop it and keep the connection.
    Malformed(String),
    /// The connection is not open.
    Closed,
}

/// Bridge-side state of one browser connection.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    session_id: SessionId,
    state: ConnectionState,
    supports_binary: Arc<AtomicBool>,
}

impl Connection {
    pub fn new(id: ConnectionId, session_id: SessionId) -> Self {
        Self {
            id,
            session_id,
            state: ConnectionState::Connecting,
            supports_binary: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn supports_binary(&self) -> bool {
        self.supports_binary.load(Ordering::Relaxed)
    }

    /// Shared handle on the binary-frame flag, for the send task.
    pub fn binary_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.supports_binary)
    }

    /// Attach to the session and enter `Open`.
    ///
    /// Binary frames are assumed supported until the client says otherwise.
    /// Fails if the session is gone, leaving the connection `Closed`.
    pub fn open(&mut self, registry: &SessionRegistry) -> Result<SessionHandle, RegistryError> {
        if self.state != ConnectionState::Connecting {
            return Err(RegistryError::UnknownSession(self.session_id));
        }
        match registry.attach(self.session_id, self.id) {
            Ok(handle) => {
                self.supports_binary.store(true, Ordering::Relaxed);
                self.state = ConnectionState::Open;
                debug!(session = %self.session_id, connection = %self.id, "connection open");
                Ok(handle)
            }
            Err(err) => {
                self.state = ConnectionState::Closed;
                Err(err)
            }
        }
    }

    /// Detach from the session and enter `Closed`.
    ///
    /// Returns `None` when the connection was never open or is already closed.
    pub fn close(
        &mut self,
        registry: &SessionRegistry,
    ) -> Option<Result<Detached, RegistryError>> {
        let was_open = self.state == ConnectionState::Open;
        self.state = ConnectionState::Closed;
        if !was_open {
            return None;
        }
        debug!(session = %self.session_id, connection = %self.id, "connection closed");
        Some(registry.detach(self.session_id, self.id))
    }

    /// Classify one inbound text frame.
    pub fn on_text(&self, text: &str) -> Inbound {
        if self.state != ConnectionState::Open {
            return Inbound::Closed;
        }

        let event: InteractionEvent = match serde_json::from_str(text) {
            Ok(event) => event,
            Err(e) => return Inbound::Malformed(e.to_string()),
        };

        if event.is_motion() {
            trace!(connection = %self.id, "motion_notify");
        } else {
            debug!(connection = %self.id, kind = %event.kind, "inbound event");
        }

        if event.kind == SUPPORTS_BINARY {
            let Some(value) = event.flag("value") else {
                return Inbound::Malformed("supports_binary without boolean value".into());
            };
            self.supports_binary.store(value, Ordering::Relaxed);
            return Inbound::Handled;
        }

        Inbound::Forward(event)
    }
}

/// Frame an update for a client.
pub fn encode_update(update: RenderUpdate, supports_binary: bool) -> Message {
    match update {
        RenderUpdate::Json(value) => Message::Text(value.to_string().into()),
        RenderUpdate::Blob(bytes) if supports_binary => Message::Binary(bytes),
        RenderUpdate::Blob(bytes) => {
            let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + bytes.len() * 4 / 3 + 4);
            uri.push_str(PNG_DATA_URI_PREFIX);
            STANDARD.encode_string(&bytes, &mut uri);
            Message::Text(uri.into())
        }
    }
}
