//! Server crate: Axum web service for live, server-rendered plots.
//!
//! Owns the session registry and the protocol bridge between browser
//! connections and render managers.
//!
//! # Architecture
//!
//! ```text
//! POST /DataFrame{n} ──▶ plot::build ──▶ RenderEngine::instantiate ──▶ SessionRegistry::create
//!                                                                            │
//! GET /{id}/ws ──▶ Connection::open (attach) ◀───────────────────────────────┘
//!        │   ▲
//!  events│   │frames         ┌───────────────┐
//!        ▼   └───────────────│ RenderManager │ (shared by every viewer)
//!   handle_event ───────────▶└───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Axum application builder and router setup
//! - [`state`]: Shared server state (registry, dataset provider, engine, metrics)
//! - [`error`]: Unified error handling with HTTP status codes
//! - [`registry`]: Session table and lifetime policy
//! - [`bridge`]: Per-connection state machine and frame encoding
//! - [`export`]: Static export of a session's figure
//! - [`routes`]: HTTP route handlers

pub mod app;
pub mod bridge;
pub mod error;
pub mod export;
pub mod registry;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use app::{ServerConfig, create_app};
pub use bridge::{Connection, ConnectionState, Inbound, encode_update};
pub use error::{AppError, AppResult};
pub use export::{Export, export};
pub use registry::{Detached, RegistryError, SessionHandle, SessionRegistry};
pub use state::{ServerMetrics, ServerState};
