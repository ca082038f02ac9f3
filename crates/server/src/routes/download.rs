//! Export endpoint.
//!
//! - `GET /{id}/download.{fmt}` - the session's current view as `fmt`

use std::sync::Arc;

use axum::extract::{Path, State};
use types::SessionId;

use crate::error::{AppError, AppResult};
use crate::export::{self, Export};
use crate::state::ServerState;

/// File name prefix of export requests.
pub const DOWNLOAD_PREFIX: &str = "download.";

/// `GET /{id}/{file}` where `file` is `download.{fmt}`.
pub async fn download(
    State(state): State<ServerState>,
    Path((id, file)): Path<(String, String)>,
) -> AppResult<Export> {
    let Some(format) = file.strip_prefix(DOWNLOAD_PREFIX).map(str::to_string) else {
        return Err(AppError::NotFound(format!("/{}/{}", id, file)));
    };
    let session: SessionId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("/{}/{}", id, file)))?;

    let registry = Arc::clone(&state.registry);
    let export =
        tokio::task::spawn_blocking(move || export::export(&registry, session, &format)).await??;
    state.metrics.export_served();

    Ok(export)
}
