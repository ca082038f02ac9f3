//! Render managers for live plots.
//!
//! Provides the seam between the server and whatever draws the figures.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ handle_event  ┌─────────────────┐  RenderUpdate   ┌─────────┐
//! │ Bridge (N per│ ────────────▶ │  RenderManager  │ ──────────────▶ │ sink 1  │
//! │   session)   │               │ (one per figure)│ ──────────────▶ │ sink N  │
//! └──────────────┘               └─────────────────┘                 └─────────┘
//! ```
//!
//! # Modules
//!
//! - [`manager`]: `RenderManager` and `RenderEngine` traits
//! - [`event`]: inbound `InteractionEvent`, outbound `RenderUpdate`
//! - [`engine`]: plotters-backed reference engine
//! - [`view`]: canvas layout and zoom/pan window
//! - [`postscript`]: PS/EPS writer
//! - [`client`]: browser glue script generator

pub mod client;
mod draw;
pub mod engine;
pub mod error;
pub mod event;
pub mod manager;
pub mod postscript;
pub mod view;

pub use engine::{EngineConfig, PlottersEngine, PlottersManager};
pub use error::{RenderError, RenderResult};
pub use event::{
    InteractionEvent, MOTION_NOTIFY, RenderUpdate, SUPPORTS_BINARY, UpdateSink, update_channel,
};
pub use manager::{RenderEngine, RenderManager};
