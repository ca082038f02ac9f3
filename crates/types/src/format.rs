//! Static export formats.
//!
//! The set is closed: a format string either maps to one of these variants or
//! is rejected with [`UnsupportedFormat`]. Nothing falls back to a default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A static file format a figure can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Ps,
    Eps,
    Pdf,
    Svg,
    Png,
    Jpeg,
    Tiff,
}

/// Rejected format extension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export format: {0}")]
pub struct UnsupportedFormat(pub String);

impl ExportFormat {
    /// Every supported format.
    pub const ALL: [ExportFormat; 7] = [
        ExportFormat::Ps,
        ExportFormat::Eps,
        ExportFormat::Pdf,
        ExportFormat::Svg,
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Tiff,
    ];

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ps => "ps",
            ExportFormat::Eps => "eps",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Tiff => "tif",
        }
    }

    /// Content-type header value for a download in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Ps | ExportFormat::Eps => "application/postscript",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Tiff => "image/tiff",
        }
    }

    /// Whether the format is vector rather than raster.
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            ExportFormat::Ps | ExportFormat::Eps | ExportFormat::Pdf | ExportFormat::Svg
        )
    }
}

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ps" => Ok(ExportFormat::Ps),
            "eps" => Ok(ExportFormat::Eps),
            "pdf" => Ok(ExportFormat::Pdf),
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "tif" | "tiff" => Ok(ExportFormat::Tiff),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
