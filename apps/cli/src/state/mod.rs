//! # State Module
//!
//! Application state for the invoice portal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌────────────────────────┐    │
//! │  │  FormState   │  │   ConfigState    │  │     ExportState        │    │
//! │  │              │  │                  │  │                        │    │
//! │  │  Arc<Mutex<  │  │  brand_name      │  │  ExportTrigger         │    │
//! │  │  InvoiceForm │  │  currency_symbol │  │  (LopdfRenderer +      │    │
//! │  │  >>          │  │  theme, layout   │  │   DirectorySink)       │    │
//! │  └──────────────┘  └──────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • FormState: Arc<Mutex<T>>, every mutation holds the lock             │
//! │  • ConfigState: read-only after startup                                │
//! │  • ExportState: renderer and sink are shared behind Arc                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod export;
mod form;

pub use config::{ConfigError, ConfigOverrides, ConfigState};
pub use export::ExportState;
pub use form::FormState;
