//! # Export Trigger
//!
//! ```text
//! idle ──request()──► export in progress ──render ok──► save ──► idle
//!                            │                              │
//!                            └──render err──────────────────┴──► ExportError
//! ```
//!
//! Each request is independent: nothing stops a second export from
//! starting while the first is still rendering, and each one saves its
//! own file exactly once. There is no retry or cancellation.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::document::PdfDocument;
use crate::error::{ExportError, ExportResult};
use crate::layout::LayoutOptions;
use crate::render::PdfRenderer;
use crate::view::InvoiceView;

/// Stem used when the invoice number leaves nothing usable.
pub const FALLBACK_STEM: &str = "invoice";

/// File name for an exported invoice: the invoice number plus `.pdf`.
///
/// Path separators are replaced with `_` so the file always lands in the
/// target directory. An empty number (or `.`/`..`) saves as `invoice.pdf`.
///
/// ## Example
/// ```
/// use invoice_pdf::export_filename;
///
/// assert_eq!(export_filename("INV-42"), "INV-42.pdf");
/// assert_eq!(export_filename("2024/07"), "2024_07.pdf");
/// assert_eq!(export_filename(""), "invoice.pdf");
/// ```
pub fn export_filename(invoice_number: &str) -> String {
    let stem: String = invoice_number
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if stem.trim().is_empty() || stem == "." || stem == ".." {
        warn!(invoice_number, "Invoice number is not a file name, saving as {}.pdf", FALLBACK_STEM);
        return format!("{}.pdf", FALLBACK_STEM);
    }
    format!("{}.pdf", stem)
}

// =============================================================================
// Sinks
// =============================================================================

/// Where finished documents go.
pub trait DocumentSink: Send + Sync {
    /// Stores the document under `filename`, returning where it ended up.
    fn save(&self, document: &PdfDocument, filename: &str) -> ExportResult<PathBuf>;
}

/// Saves documents into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

impl DocumentSink for DirectorySink {
    fn save(&self, document: &PdfDocument, filename: &str) -> ExportResult<PathBuf> {
        let path = self.dir.join(filename);
        document.save(&path)?;
        Ok(path)
    }
}

// =============================================================================
// Trigger
// =============================================================================

/// A saved export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPdf {
    pub filename: String,
    pub path: PathBuf,
    pub page_count: usize,
}

/// Starts exports.
#[derive(Clone)]
pub struct ExportTrigger {
    renderer: Arc<dyn PdfRenderer>,
    sink: Arc<dyn DocumentSink>,
    layout: LayoutOptions,
}

impl ExportTrigger {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        sink: Arc<dyn DocumentSink>,
        layout: LayoutOptions,
    ) -> Self {
        ExportTrigger {
            renderer,
            sink,
            layout,
        }
    }

    /// Hands `view` to the renderer on the blocking pool.
    ///
    /// The snapshot and filename are owned by the task from here on. When
    /// rendering finishes the document is saved once under `filename`.
    /// Must be called from within a tokio runtime.
    pub fn request(&self, view: InvoiceView, filename: String) -> ExportTask {
        let renderer = Arc::clone(&self.renderer);
        let sink = Arc::clone(&self.sink);
        let layout = self.layout;

        debug!(filename = %filename, "Export requested");

        let handle = tokio::task::spawn_blocking(move || {
            let document = renderer.render(&view, &layout)?;
            let path = sink.save(&document, &filename)?;
            info!(path = %path.display(), pages = document.page_count(), "Invoice exported");
            Ok(SavedPdf {
                filename,
                path,
                page_count: document.page_count(),
            })
        });

        ExportTask { handle }
    }
}

/// An export in progress.
pub struct ExportTask {
    handle: JoinHandle<ExportResult<SavedPdf>>,
}

impl ExportTask {
    /// Waits for render and save to finish.
    pub async fn wait(self) -> ExportResult<SavedPdf> {
        self.handle
            .await
            .map_err(|e| ExportError::TaskFailed(e.to_string()))?
    }
}
