//! # Export State
//!
//! The renderer and the save target, wired once from configuration.

use std::sync::Arc;

use invoice_pdf::{
    DirectorySink, DocumentSink, ExportError, ExportTrigger, LopdfRenderer, PdfRenderer,
};

use super::ConfigState;

/// Starts PDF exports for the commands.
#[derive(Clone)]
pub struct ExportState {
    trigger: ExportTrigger,
}

impl ExportState {
    /// Renders with lopdf and the configured fonts, saving into
    /// `config.output_dir`.
    pub fn from_config(config: &ConfigState) -> Result<Self, ExportError> {
        let renderer = LopdfRenderer::with_fonts(config.font_set()?);
        Ok(Self::new(
            Arc::new(renderer),
            Arc::new(DirectorySink::new(config.output_dir.clone())),
            config,
        ))
    }

    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        sink: Arc<dyn DocumentSink>,
        config: &ConfigState,
    ) -> Self {
        ExportState {
            trigger: ExportTrigger::new(renderer, sink, config.layout),
        }
    }

    pub fn trigger(&self) -> &ExportTrigger {
        &self.trigger
    }
}
