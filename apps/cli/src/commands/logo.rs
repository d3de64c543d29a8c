//! # Logo Command
//!
//! ```text
//! logo ./brand.png
//!      │
//!      ▼
//! tokio::fs::read ──► decode_logo (sniff MIME, base64) ──► form.logo = data URL
//!      │                    │
//!      └── error ───────────┴──► warn!, logo left as it was
//! ```
//!
//! Reading is asynchronous; other commands keep working while it runs, and
//! the form only changes once the whole file has been read.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use invoice_core::logo::decode_logo;

use crate::state::FormState;

/// Outcome of an upload. Failure is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoResponse {
    pub accepted: bool,
    /// MIME type of the stored logo, if one was stored
    pub mime: Option<String>,
}

/// Reads an image file and stores it as the form's logo.
///
/// An unreadable file or a non-image leaves the current logo unchanged.
pub async fn upload_logo(form: &FormState, path: &Path) -> LogoResponse {
    debug!(path = %path.display(), "upload_logo command");

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Logo file could not be read");
            return LogoResponse {
                accepted: false,
                mime: None,
            };
        }
    };

    match decode_logo(&bytes) {
        Ok(logo) => {
            let mime = logo.mime().to_string();
            form.with_form_mut(|f| f.set_logo(logo));
            debug!(mime = %mime, size = bytes.len(), "Logo stored");
            LogoResponse {
                accepted: true,
                mime: Some(mime),
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Logo file is not a usable image");
            LogoResponse {
                accepted: false,
                mime: None,
            }
        }
    }
}
