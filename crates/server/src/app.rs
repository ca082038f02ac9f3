//! Axum application builder.
//!
//! Configures routes, middleware, and state for the server.
//!
//! # Routes
//!
//! - `GET /` - dataset index
//! - `GET /health` - liveness
//! - `GET /mpl.js` - client glue script
//! - `/_static/*` - static assets from the engine's static root
//! - `GET|POST /DataFrame{n}` - create a plot session
//! - `GET /{id}/ws` - live connection to session `id`
//! - `GET /{id}/download.{fmt}` - export session `id`

use axum::Router;
use axum::routing::get;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes::{assets, download, health, pages, ws};
use crate::state::ServerState;

/// Create the Axum application with all routes.
pub fn create_app(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let static_files = ServeDir::new(state.engine.static_dir());

    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health))
        .route("/mpl.js", get(assets::client_script))
        .nest_service("/_static", static_files)
        // `{id}` is a dataset segment here and a session id below.
        .route("/{id}", get(pages::plot_get).post(pages::plot_post))
        .route("/{id}/ws", get(ws::ws_handler))
        .route("/{id}/{file}", get(download::download))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
}

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".into(),
        }
    }
}

impl ServerConfig {
    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
