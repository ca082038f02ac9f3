//! Export handler.
//!
//! `export(session, format)` validates the format against the fixed set in
//! [`ExportFormat`], looks the session up and asks its render manager for
//! bytes. The format is checked first, so a bad extension never reaches a
//! manager. Session and connection state are left untouched.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use types::{ExportFormat, SessionId};

use crate::error::{AppError, AppResult};
use crate::registry::SessionRegistry;

/// Exported bytes tagged with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Export {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

impl IntoResponse for Export {
    fn into_response(self) -> Response {
        let disposition = format!("inline; filename=\"download.{}\"", self.format.extension());
        (
            [
                (header::CONTENT_TYPE, self.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Render `session` in the format named by `format`.
///
/// Blocking: the render manager encodes synchronously.
pub fn export(registry: &SessionRegistry, session: SessionId, format: &str) -> AppResult<Export> {
    let format: ExportFormat = format.parse()?;
    let handle = registry.get(session)?;

    let bytes = handle
        .manager
        .export(format)
        .map_err(AppError::RenderExport)?;
    debug!(%session, %format, len = bytes.len(), "exported figure");

    Ok(Export { format, bytes })
}
