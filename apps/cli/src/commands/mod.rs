//! # Commands Module
//!
//! Every operation the session and draft replay can perform.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── form.rs     ◄─── Header fields (customer, number, date) and reads
//! ├── items.rs    ◄─── Line item rows
//! ├── logo.rs     ◄─── Logo upload
//! └── export.rs   ◄─── PDF download
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the form
//! fn add_item(form: &FormState) -> ItemsResponse
//!
//! // Needs form, config and the export trigger
//! async fn download_pdf(form: &FormState, config: &ConfigState, export: &ExportState)
//! ```

pub mod export;
pub mod form;
pub mod items;
pub mod logo;
