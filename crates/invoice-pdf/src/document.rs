//! Rendered document handle.

use std::path::Path;

use crate::error::{ExportError, ExportResult};

/// A finished PDF, held in memory until it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    bytes: Vec<u8>,
    page_count: usize,
}

impl PdfDocument {
    pub fn new(bytes: Vec<u8>, page_count: usize) -> Self {
        PdfDocument { bytes, page_count }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Writes the document to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> ExportResult<()> {
        std::fs::write(path, &self.bytes).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
