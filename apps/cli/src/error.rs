//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Invoice Portal                     │
//! │                                                                         │
//! │  Session line               Command                                     │
//! │  ────────────               ───────                                     │
//! │                                                                         │
//! │  item 7 qty 2 ──────────► update_item() ── CoreError::ItemIndex... ──┐ │
//! │                                                                       │ │
//! │  date 31/12/2024 ───────► set_invoice_date() ── ValidationError ─────┤ │
//! │                                                                       │ │
//! │  export ────────────────► download_pdf() ── ExportError::Io ─────────┤ │
//! │                                                                       ▼ │
//! │                                                          ApiError {code,│
//! │                                                            message}     │
//! │                                                                       │ │
//! │  ◄── "error: [NOT_FOUND] Line item 7 does not exist ..." ─────────────┘ │
//! │      (the session prints it and keeps reading)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric input never fails (it becomes `NaN`), and a logo that cannot be
//! read is dropped silently, so neither shows up here.

use serde::Serialize;

use invoice_core::{CoreError, ValidationError};
use invoice_pdf::ExportError;

use crate::state::ConfigError;

/// Error returned from commands.
///
/// ## Serialization
/// What `json` consumers receive when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Line item 7 does not exist (form has 3 rows)"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Row index does not exist
    NotFound,

    /// Input validation failed (dates, field names, session syntax)
    ValidationError,

    /// Rendering the PDF failed
    ExportError,

    /// Reading or writing a file failed
    IoError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemIndexOutOfRange { .. } => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
            CoreError::Logo(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts export errors to API errors.
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io { .. } => ApiError::new(ErrorCode::IoError, err.to_string()),
            ExportError::Font(_) => ApiError::new(ErrorCode::ConfigError, err.to_string()),
            ExportError::Render(_) => ApiError::new(ErrorCode::ExportError, err.to_string()),
            ExportError::TaskFailed(e) => {
                tracing::error!("Export task failed: {}", e);
                ApiError::internal("Export did not complete")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::new(ErrorCode::IoError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = serde_json::to_value(self.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| format!("{:?}", self.code));
        write!(f, "[{}] {}", code, self.message)
    }
}

impl std::error::Error for ApiError {}
