//! Route handlers.
//!
//! # Modules
//!
//! - [`health`]: liveness endpoint
//! - [`pages`]: dataset index and plot creation pages
//! - [`ws`]: WebSocket endpoint bridging browsers to render managers
//! - [`download`]: static export of a session's figure
//! - [`assets`]: generated client script

pub mod assets;
pub mod download;
pub mod health;
pub mod pages;
pub mod ws;
