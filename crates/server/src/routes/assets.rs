//! Generated client assets.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::state::ServerState;

/// `GET /mpl.js`: the engine's browser glue script.
pub async fn client_script(State(state): State<ServerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        state.engine.client_script(),
    )
}
