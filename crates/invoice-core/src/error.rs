//! # Error Types
//!
//! Domain-specific error types for invoice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  invoice-core errors (this file)                                       │
//! │  ├── CoreError        - Form mutation failures                         │
//! │  ├── ValidationError  - Unparseable non-numeric input (dates, fields)  │
//! │  └── LogoError        - Logo payload could not be produced             │
//! │                                                                         │
//! │  invoice-pdf errors (separate crate)                                   │
//! │  └── ExportError      - Rendering and save failures                    │
//! │                                                                         │
//! │  Shell errors (in app)                                                 │
//! │  └── ApiError         - What the session prints                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric field input never produces an error: it coerces to `NaN`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Form mutation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Row index does not address an existing line item.
    ///
    /// ## When This Occurs
    /// - `item 5 name ...` on a form that has three rows
    #[error("Line item {index} does not exist (form has {len} rows)")]
    ItemIndexOutOfRange { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Logo error (wraps LogoError).
    #[error("Logo error: {0}")]
    Logo(#[from] LogoError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input errors for the few fields that are not free text or numbers.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid format (e.g., a date that is not `YYYY-MM-DD`).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Logo Error
// =============================================================================

/// Reasons an uploaded file does not become a logo.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogoError {
    /// Zero-length file, or no file selected.
    #[error("no image data")]
    Empty,

    /// Bytes are not a recognised image format.
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// Stored payload is not a base64 data URL.
    #[error("malformed data URL: {0}")]
    MalformedDataUrl(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
