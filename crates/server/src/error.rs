//! Unified error handling for the server.
//!
//! Every request-path failure becomes an [`AppError`], which maps to an HTTP
//! status and a JSON body `{"error": kind, "message": detail, "status": code}`.
//! Malformed WebSocket messages never reach this type; the bridge drops them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dataset::DatasetError;
use plot::SpecError;
use render::RenderError;
use serde_json::json;
use types::{DatasetId, SessionId, UnsupportedFormat};

use crate::registry::RegistryError;

/// Application error type with HTTP response mapping.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad column selection (400).
    #[error(transparent)]
    InvalidColumn(#[from] SpecError),

    /// Session id not in the registry (404).
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// Dataset id not served by the provider (404).
    #[error("unknown dataset: {0}")]
    UnknownDataset(DatasetId),

    /// Export format outside the supported set (400).
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    /// Render manager failed to export (500).
    #[error("export failed: {0}")]
    RenderExport(#[source] RenderError),

    /// Render engine failed to create a manager (500).
    #[error("render engine failed: {0}")]
    Render(#[source] RenderError),

    /// Session id space exhausted (500).
    #[error("session registry exhausted")]
    RegistryExhausted,

    /// No such page (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and machine-readable kind.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidColumn(_) => (StatusCode::BAD_REQUEST, "invalid_column"),
            AppError::UnknownSession(_) => (StatusCode::NOT_FOUND, "unknown_session"),
            AppError::UnknownDataset(_) => (StatusCode::NOT_FOUND, "unknown_dataset"),
            AppError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "unsupported_format"),
            AppError::RenderExport(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_export"),
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render"),
            AppError::RegistryExhausted => {
                (StatusCode::INTERNAL_SERVER_ERROR, "registry_exhausted")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = axum::Json(json!({
            "error": kind,
            "message": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownSession(id) => AppError::UnknownSession(id),
            RegistryError::Exhausted => AppError::RegistryExhausted,
            RegistryError::IdCollision(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::UnknownDataset(id) => AppError::UnknownDataset(id),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("worker task failed: {}", err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::UnknownSession(SessionId(9));
        assert_eq!(err.to_string(), "unknown session: 9");

        let err: AppError = UnsupportedFormat("emf".into()).into();
        assert_eq!(err.to_string(), "unsupported export format: emf");

        let err = AppError::RenderExport(RenderError::Draw("backend gone".into()));
        assert_eq!(err.to_string(), "export failed: drawing failed: backend gone");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidColumn(SpecError::NoSeries).status().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownSession(SessionId(1)).status().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RegistryError::Exhausted).status().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(DatasetError::UnknownDataset(DatasetId(4))).status(),
            (StatusCode::NOT_FOUND, "unknown_dataset")
        );
    }
}
