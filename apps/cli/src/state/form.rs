//! # Form State
//!
//! Holds the one invoice being edited.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session line             Command               Form State Change       │
//! │  ────────────             ───────               ─────────────────       │
//! │                                                                         │
//! │  add ───────────────────► add_item() ─────────► items.push(default)    │
//! │  item 0 price 12 ───────► update_item() ──────► items[0].unitPrice=12  │
//! │  customer Asha ─────────► set_customer() ─────► customerName = "Asha"  │
//! │  logo ./logo.png ───────► upload_logo() ──────► logo = data URL        │
//! │  show / json ───────────► get_form() ─────────► (read only)            │
//! │  export ────────────────► download_pdf() ─────► (snapshot, read only)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use invoice_core::InvoiceForm;

/// Thread-safe wrapper for the invoice form.
#[derive(Debug, Clone)]
pub struct FormState {
    form: Arc<Mutex<InvoiceForm>>,
}

impl FormState {
    /// Starts a fresh form stamped with the current time.
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self::started_at(brand_name, Utc::now())
    }

    pub fn started_at(brand_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        FormState {
            form: Arc::new(Mutex::new(InvoiceForm::started_at(brand_name, now))),
        }
    }

    /// Executes a function with read access to the form.
    pub fn with_form<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InvoiceForm) -> R,
    {
        let form = self.lock();
        f(&form)
    }

    /// Executes a function with write access to the form.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// form_state.with_form_mut(|form| form.update_item(0, ItemField::Name, "Poster"))?;
    /// ```
    pub fn with_form_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut InvoiceForm) -> R,
    {
        let mut form = self.lock();
        f(&mut form)
    }

    // Poisoned locks are recovered; every form edit is a single field write.
    fn lock(&self) -> MutexGuard<'_, InvoiceForm> {
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
