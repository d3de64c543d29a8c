//! # Export Errors
//!
//! ```text
//! fonts  ──► ExportError::Font       (configured face is not TrueType)
//! render ──► ExportError::Render     (lopdf could not serialize the document)
//! save   ──► ExportError::Io         (target directory missing, permissions)
//! task   ──► ExportError::TaskFailed (render task panicked or was dropped)
//! ```
//!
//! A logo that fails to decode is NOT an error: the invoice renders
//! without it.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while producing or saving a PDF.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Document assembly or serialization failed.
    #[error("PDF generation failed: {0}")]
    Render(String),

    /// Writing the file failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font file could not be parsed as TrueType.
    #[error("Unusable font {0}")]
    Font(String),

    /// The render task ended without delivering a document.
    #[error("Export task failed: {0}")]
    TaskFailed(String),
}

/// Convenience type alias for export results.
pub type ExportResult<T> = Result<T, ExportError>;
