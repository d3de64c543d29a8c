//! # Form Commands
//!
//! Reads of the whole form and edits of the header fields.

use serde::Serialize;
use tracing::debug;

use invoice_core::{InvoiceForm, InvoiceTotals, LineItem};

use crate::error::ApiError;
use crate::state::FormState;

/// The whole form as the page shows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub brand_name: String,
    pub customer_name: String,
    pub invoice_number: String,
    /// `YYYY-MM-DD`, or empty when the date was cleared
    pub invoice_date: String,
    pub has_logo: bool,
    pub items: Vec<LineItem>,
    pub totals: InvoiceTotals,
}

impl From<&InvoiceForm> for FormResponse {
    fn from(form: &InvoiceForm) -> Self {
        FormResponse {
            brand_name: form.brand_name().to_string(),
            customer_name: form.customer_name().to_string(),
            invoice_number: form.invoice_number().to_string(),
            invoice_date: form.invoice_date_text(),
            has_logo: form.logo().is_some(),
            items: form.line_items().to_vec(),
            totals: form.totals(),
        }
    }
}

/// Gets the current form.
pub fn get_form(form: &FormState) -> FormResponse {
    debug!("get_form command");
    form.with_form(|f| FormResponse::from(f))
}

/// Replaces the customer name. Any text is accepted, including empty.
pub fn set_customer(form: &FormState, name: &str) -> FormResponse {
    debug!(name = %name, "set_customer command");
    form.with_form_mut(|f| {
        f.set_customer_name(name);
        FormResponse::from(&*f)
    })
}

/// Replaces the invoice number. Any text is accepted, including empty.
pub fn set_invoice_number(form: &FormState, number: &str) -> FormResponse {
    debug!(number = %number, "set_invoice_number command");
    form.with_form_mut(|f| {
        f.set_invoice_number(number);
        FormResponse::from(&*f)
    })
}

/// Sets the invoice date from `YYYY-MM-DD`; blank input clears it.
///
/// ## Errors
/// Any other format is rejected and the date is left unchanged.
pub fn set_invoice_date(form: &FormState, raw: &str) -> Result<FormResponse, ApiError> {
    debug!(raw = %raw, "set_invoice_date command");
    form.with_form_mut(|f| {
        f.set_invoice_date(raw)?;
        Ok(FormResponse::from(&*f))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{TimeZone, Utc};

    fn state() -> FormState {
        FormState::started_at(
            "Dhruba Creation",
            Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_get_form_initial_state() {
        let form = get_form(&state());

        assert_eq!(form.brand_name, "Dhruba Creation");
        assert_eq!(form.invoice_number, "INV-1710027000000");
        assert_eq!(form.invoice_date, "2024-03-09");
        assert_eq!(form.customer_name, "");
        assert_eq!(form.items.len(), 1);
        assert_eq!(form.totals.subtotal.value(), 0.0);
        assert!(!form.has_logo);
    }

    #[test]
    fn test_header_edits() {
        let state = state();
        set_customer(&state, "Asha");
        let form = set_invoice_number(&state, "");

        assert_eq!(form.customer_name, "Asha");
        assert_eq!(form.invoice_number, "");
    }

    #[test]
    fn test_date_set_clear_and_reject() {
        let state = state();

        assert_eq!(set_invoice_date(&state, "2024-12-31").unwrap().invoice_date, "2024-12-31");

        let err = set_invoice_date(&state, "31/12/2024").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_form(&state).invoice_date, "2024-12-31");

        assert_eq!(set_invoice_date(&state, "").unwrap().invoice_date, "");
    }

    #[test]
    fn test_response_json_shape() {
        let json = serde_json::to_value(get_form(&state())).unwrap();
        assert_eq!(json["invoiceNumber"], "INV-1710027000000");
        assert_eq!(json["items"][0]["unitPrice"], 0.0);
        assert_eq!(json["items"][0]["quantity"], 1.0);
    }
}
