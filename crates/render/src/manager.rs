//! The render manager and engine seams.
//!
//! The server never draws anything itself. A [`RenderEngine`] turns a
//! [`Figure`] into a [`RenderManager`], and the manager owns everything
//! rendering-related from then on: interactive view state, the set of
//! update sinks, and static export.

use std::path::Path;
use std::sync::Arc;

use plot::Figure;
use types::{ConnectionId, ExportFormat};

use crate::error::RenderResult;
use crate::event::{InteractionEvent, UpdateSink};

/// Live renderer for one figure.
///
/// Implementations must be safe to call from several connections at once;
/// calls may be slow and are made off the async executor.
pub trait RenderManager: Send + Sync {
    /// Apply a browser event, emitting any resulting updates to every sink.
    fn handle_event(&self, event: &InteractionEvent) -> RenderResult<()>;

    /// Start sending updates to `sink`.
    fn add_sink(&self, id: ConnectionId, sink: UpdateSink);

    /// Stop sending updates to the sink registered under `id`.
    fn remove_sink(&self, id: ConnectionId);

    /// Number of attached sinks.
    fn sink_count(&self) -> usize;

    /// Render the current view to a static format.
    fn export(&self, format: ExportFormat) -> RenderResult<Vec<u8>>;
}

/// Factory for render managers plus the browser-side assets they need.
pub trait RenderEngine: Send + Sync {
    /// Create a manager drawing `figure`.
    fn instantiate(&self, figure: Arc<Figure>) -> RenderResult<Arc<dyn RenderManager>>;

    /// Directory of static assets served under `/_static`.
    fn static_dir(&self) -> &Path;

    /// Client-side glue script served as `/mpl.js`.
    fn client_script(&self) -> String;
}
