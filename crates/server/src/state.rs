//! Shared server state.
//!
//! Cloned into each handler via Axum's `State` extractor. Everything inside
//! is reference counted; the registry is the only mutable shared structure
//! and guards itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dataset::DatasetProvider;
use render::RenderEngine;

use crate::registry::SessionRegistry;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Live plot sessions.
    pub registry: Arc<SessionRegistry>,

    /// Source of the tables behind `/DataFrame{n}`.
    pub datasets: Arc<dyn DatasetProvider>,

    /// Figure renderer.
    pub engine: Arc<dyn RenderEngine>,

    /// Server start time.
    pub start_time: Instant,

    /// Shared metrics.
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    pub fn new(datasets: Arc<dyn DatasetProvider>, engine: Arc<dyn RenderEngine>) -> Self {
        Self::with_registry(Arc::new(SessionRegistry::new()), datasets, engine)
    }

    /// State around an existing registry.
    pub fn with_registry(
        registry: Arc<SessionRegistry>,
        datasets: Arc<dyn DatasetProvider>,
        engine: Arc<dyn RenderEngine>,
    ) -> Self {
        Self {
            registry,
            datasets,
            engine,
            start_time: Instant::now(),
            metrics: Arc::new(ServerMetrics::new()),
        }
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Server-side counters.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Sessions created since start.
    pub sessions_created: AtomicU64,
    /// Open WebSocket connections.
    pub ws_connections: AtomicU64,
    /// Inbound messages dropped as malformed.
    pub malformed_messages: AtomicU64,
    /// Exports served.
    pub exports: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_created(&self) {
        self.sessions_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment WebSocket connection count.
    pub fn ws_connect(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement WebSocket connection count.
    pub fn ws_disconnect(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn malformed_message(&self) {
        self.malformed_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn export_served(&self) {
        self.exports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sessions(&self) -> u64 {
        self.sessions_created.load(Ordering::Relaxed)
    }

    /// Get WebSocket connection count.
    pub fn ws_count(&self) -> u64 {
        self.ws_connections.load(Ordering::Relaxed)
    }

    pub fn malformed(&self) -> u64 {
        self.malformed_messages.load(Ordering::Relaxed)
    }

    pub fn export_count(&self) -> u64 {
        self.exports.load(Ordering::Relaxed)
    }
}
