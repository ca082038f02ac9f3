//! Live Plot - main binary
//!
//! Serves synthetic datasets as interactive plots: each plot request creates
//! a session, browsers attach to it over WebSocket and every viewer sees every
//! change.
//!
//! ```text
//! browser ──HTTP──▶ axum router ──▶ SessionRegistry ──▶ PlottersManager
//!    ▲                                                      │
//!    └──────────────────── WebSocket frames ◀───────────────┘
//! ```

mod config;

use std::sync::Arc;

use clap::Parser;
use render::PlottersEngine;
use server::{ServerState, create_app};
use tracing::info;

use crate::config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let server_config = args.server();

    let state = ServerState::new(
        Arc::new(args.provider()),
        Arc::new(PlottersEngine::new(args.engine())),
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        static_dir = %args.static_dir.display(),
        "live-plot listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
    }
}
