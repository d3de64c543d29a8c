//! # invoice-core: Pure Form Logic for the Invoice Portal
//!
//! This crate holds everything the invoice form computes, as pure functions
//! and plain data with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Portal Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Command Shell (apps/cli)                     │   │
//! │  │    customer / number / date / item / add / logo / export        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ invoice-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   form    │  │  amount   │  │  totals   │  │  coerce   │  │   │
//! │  │   │InvoiceForm│  │  Amount   │  │ subtotal  │  │ Number()  │  │   │
//! │  │   │ LineItem  │  │ toFixed(2)│  │  Totals   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO RENDERING • NO FILES • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 invoice-pdf (Export Layer)                      │   │
//! │  │          snapshot, layout, PDF renderer, save step              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`form`] - The invoice form state and its mutations
//! - [`types`] - Line items and field addressing
//! - [`amount`] - Float amount with two-decimal display
//! - [`totals`] - The subtotal reduction
//! - [`coerce`] - Numeric input coercion
//! - [`logo`] - Logo payload decoding
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use invoice_core::{InvoiceForm, ItemField};
//!
//! let mut form = InvoiceForm::new("Dhruba Creation");
//! form.add_item();
//! form.update_item(1, ItemField::UnitPrice, 10).unwrap();
//! form.update_item(1, ItemField::Quantity, "2").unwrap();
//!
//! assert_eq!(form.subtotal().to_string(), "20.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod coerce;
pub mod error;
pub mod form;
pub mod logo;
pub mod totals;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::Amount;
pub use error::{CoreError, LogoError, ValidationError};
pub use form::InvoiceForm;
pub use logo::LogoImage;
pub use totals::{subtotal, InvoiceTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Brand printed at the top of every invoice unless configured otherwise.
pub const DEFAULT_BRAND_NAME: &str = "Dhruba Creation";

/// Prefix of the timestamp-derived default invoice number.
pub const INVOICE_NUMBER_PREFIX: &str = "INV-";

/// Quantity of a freshly added row.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Unit price of a freshly added row.
pub const DEFAULT_UNIT_PRICE: f64 = 0.0;
