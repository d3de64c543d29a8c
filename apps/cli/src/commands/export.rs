//! # Export Command
//!
//! ```text
//! download_pdf
//!   │
//!   ├─ lock form ─► InvoiceView::capture + export_filename(number) ─► unlock
//!   │                 (synchronous: later edits cannot reach this export)
//!   │
//!   ├─ ExportTrigger::request ─► render on the blocking pool
//!   │
//!   └─ await ─► saved exactly once as "<invoiceNumber>.pdf"
//!               (or "invoice.pdf" when the number is blank)
//! ```

use serde::Serialize;
use tracing::{debug, info};

use invoice_pdf::{export_filename, ExportTask, InvoiceView};

use crate::error::ApiError;
use crate::state::{ConfigState, ExportState, FormState};

/// Where the PDF was saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub filename: String,
    pub path: String,
    pub page_count: usize,
}

/// Captures the invoice as it is right now and starts rendering it.
///
/// The returned task owns the snapshot; edits made after this returns do
/// not affect the file.
pub fn start_export(form: &FormState, config: &ConfigState, export: &ExportState) -> ExportTask {
    let options = config.view_options();
    let (view, filename) = form.with_form(|f| {
        (InvoiceView::capture(f, &options), export_filename(f.invoice_number()))
    });
    debug!(filename = %filename, theme = ?options.theme, "Export snapshot captured");
    export.trigger().request(view, filename)
}

/// Exports the current invoice to `<invoiceNumber>.pdf`.
pub async fn download_pdf(
    form: &FormState,
    config: &ConfigState,
    export: &ExportState,
) -> Result<ExportResponse, ApiError> {
    debug!("download_pdf command");
    let task = start_export(form, config, export);
    let saved = task.wait().await?;

    info!(filename = %saved.filename, pages = saved.page_count, "PDF saved");
    Ok(ExportResponse {
        filename: saved.filename,
        path: saved.path.display().to_string(),
        page_count: saved.page_count,
    })
}
