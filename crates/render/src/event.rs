//! Wire types exchanged between browsers and render managers.
//!
//! Inbound, every browser message is an [`InteractionEvent`]: a `type`
//! discriminator plus arbitrary fields, forwarded to the manager verbatim.
//! Outbound, a manager emits [`RenderUpdate`]s to each attached
//! [`UpdateSink`]; the bridge owning the sink decides how to frame them.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::{RenderError, RenderResult};

/// Event type sent on every mouse move.
pub const MOTION_NOTIFY: &str = "motion_notify";

/// Event type a client uses to declare binary frame support.
pub const SUPPORTS_BINARY: &str = "supports_binary";

/// A structured message from the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl InteractionEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Add a field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn is_motion(&self) -> bool {
        self.kind == MOTION_NOTIFY
    }

    /// Numeric field, required.
    pub fn number(&self, key: &str) -> RenderResult<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.missing(key))
    }

    /// Boolean field, optional.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    /// String field, optional.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn missing(&self, key: &str) -> RenderError {
        RenderError::BadEvent {
            kind: self.kind.clone(),
            reason: format!("missing numeric field '{}'", key),
        }
    }
}

/// One update emitted by a render manager.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUpdate {
    /// Structured payload, always sent as a text frame.
    Json(Value),
    /// Raw image bytes (PNG).
    Blob(Bytes),
}

/// Receiving end registered by each attached connection.
pub type UpdateSink = mpsc::UnboundedSender<RenderUpdate>;

/// Create a sink and the receiver the connection drains.
pub fn update_channel() -> (UpdateSink, mpsc::UnboundedReceiver<RenderUpdate>) {
    mpsc::unbounded_channel()
}
