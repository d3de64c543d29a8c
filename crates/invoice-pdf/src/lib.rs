//! # invoice-pdf: Invoice Export
//!
//! Turns the current invoice into a PDF file.
//!
//! ## Export Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Export Pipeline                                 │
//! │                                                                         │
//! │  request time (synchronous)          completion (asynchronous)          │
//! │  ──────────────────────────          ─────────────────────────          │
//! │                                                                         │
//! │  InvoiceForm ──► InvoiceView ──┐                                        │
//! │                                ├──► ExportTrigger::request()            │
//! │  invoice_number ──► filename ──┘          │                             │
//! │                                           ▼                             │
//! │                              blocking pool: PdfRenderer::render()       │
//! │                                           │                             │
//! │                                           ▼  (exactly once)             │
//! │                              DocumentSink::save(document, filename)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot and filename are taken when the export is requested, so a
//! later edit never leaks into a PDF that is already being rendered.
//!
//! ## Modules
//! - [`view`] - The painted snapshot and its two visual themes
//! - [`layout`] - Page geometry and DOM-to-page scaling
//! - [`render`] - Renderer trait and the lopdf implementation
//! - [`document`] - Rendered document handle
//! - [`export`] - Export trigger and save targets
//! - [`text`] - Embedded TrueType faces, glyph lookup and metrics

pub mod document;
pub mod error;
pub mod export;
pub mod layout;
mod paint;
pub mod render;
pub mod text;
pub mod view;

pub use document::PdfDocument;
pub use error::{ExportError, ExportResult};
pub use export::{export_filename, DirectorySink, DocumentSink, ExportTask, ExportTrigger, SavedPdf};
pub use layout::{LayoutOptions, PageSize};
pub use render::{LopdfRenderer, PdfRenderer};
pub use text::{FontProgram, FontSet};
pub use view::{InvoiceView, RowView, Theme, ViewOptions};
