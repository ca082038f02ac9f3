//! Core types shared across the live plot server.
//!
//! This crate provides the identifier newtypes used by the session registry
//! and protocol bridge, plus the fixed set of static export formats.

pub mod format;
pub mod ids;

pub use format::{ExportFormat, UnsupportedFormat};
pub use ids::{ConnectionId, DatasetId, SessionId};
