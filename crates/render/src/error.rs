//! Error types for render managers.

use types::ExportFormat;

/// Errors raised while rendering, exporting or applying an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The engine cannot produce this format.
    #[error("{0} output is not available from this engine")]
    FormatUnavailable(ExportFormat),

    /// The drawing backend failed.
    #[error("drawing failed: {0}")]
    Draw(String),

    /// Encoding the rendered pixels failed.
    #[error("image encoding failed: {0}")]
    Encode(String),

    /// An interaction event lacked a field it needs.
    #[error("malformed {kind} event: {reason}")]
    BadEvent { kind: String, reason: String },
}

impl RenderError {
    pub(crate) fn draw(err: impl std::fmt::Display) -> Self {
        RenderError::Draw(err.to_string())
    }

    pub(crate) fn encode(err: impl std::fmt::Display) -> Self {
        RenderError::Encode(err.to_string())
    }
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
