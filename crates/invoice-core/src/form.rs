//! # Invoice Form
//!
//! The single owned record behind the invoice form.
//!
//! ## Form Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Form Operations                              │
//! │                                                                         │
//! │  User Action              Method                  State Change          │
//! │  ───────────              ──────                  ────────────          │
//! │                                                                         │
//! │  "+ Add Row" ───────────► add_item() ───────────► items.push(default)   │
//! │                                                                         │
//! │  Edit row field ────────► update_item(i, f, v) ─► items[i].f = v        │
//! │                                                                         │
//! │  Edit customer ─────────► set_customer_name() ──► customer_name = v     │
//! │                                                                         │
//! │  Edit number / date ────► set_invoice_number()    invoice_number = v    │
//! │                           set_invoice_date() ───► invoice_date = v      │
//! │                                                                         │
//! │  Pick logo file ────────► set_logo() ───────────► logo = Some(v)        │
//! │                                                                         │
//! │  Any render ────────────► subtotal() ───────────► (derived, not stored) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Rows are only appended; an index keeps addressing the same row forever
//! - The brand name is fixed at construction
//! - The subtotal is never stored

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::amount::Amount;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::logo::LogoImage;
use crate::totals::{subtotal, InvoiceTotals};
use crate::types::{FieldValue, ItemField, LineItem};
use crate::INVOICE_NUMBER_PREFIX;

/// Input format of the date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The invoice being edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    brand_name: String,
    logo: Option<LogoImage>,
    customer_name: String,
    invoice_number: String,
    invoice_date: Option<NaiveDate>,
    line_items: Vec<LineItem>,
}

impl InvoiceForm {
    /// Fresh form stamped with the current time.
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self::started_at(brand_name, Utc::now())
    }

    /// Fresh form stamped with `now`: number `INV-<millis>`, date `now`'s
    /// UTC calendar day, one default row.
    pub fn started_at(brand_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        InvoiceForm {
            brand_name: brand_name.into(),
            logo: None,
            customer_name: String::new(),
            invoice_number: default_invoice_number(now),
            invoice_date: Some(now.date_naive()),
            line_items: vec![LineItem::default()],
        }
    }

    // -------------------------------------------------------------------------
    // Line items
    // -------------------------------------------------------------------------

    /// Appends one `{ name: "", quantity: 1, unitPrice: 0 }` row.
    ///
    /// Returns the new row's index.
    pub fn add_item(&mut self) -> usize {
        self.line_items.push(LineItem::default());
        self.line_items.len() - 1
    }

    /// Replaces one field of one row.
    ///
    /// Numeric fields are coerced (bad text becomes `NaN`, which is stored).
    /// An index past the end is rejected and nothing changes.
    pub fn update_item(
        &mut self,
        index: usize,
        field: ItemField,
        value: impl Into<FieldValue>,
    ) -> CoreResult<&LineItem> {
        let len = self.line_items.len();
        let item = self
            .line_items
            .get_mut(index)
            .ok_or(CoreError::ItemIndexOutOfRange { index, len })?;
        item.set_field(field, value.into());
        Ok(item)
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn item_count(&self) -> usize {
        self.line_items.len()
    }

    // -------------------------------------------------------------------------
    // Header fields
    // -------------------------------------------------------------------------

    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    /// No uniqueness or format check; an empty number is allowed.
    pub fn set_invoice_number(&mut self, number: impl Into<String>) {
        self.invoice_number = number.into();
    }

    pub fn invoice_date(&self) -> Option<NaiveDate> {
        self.invoice_date
    }

    /// Sets the date from `YYYY-MM-DD` text. Blank text clears the field,
    /// like emptying a date input.
    pub fn set_invoice_date(&mut self, raw: &str) -> CoreResult<Option<NaiveDate>> {
        let raw = raw.trim();
        let date = if raw.is_empty() {
            None
        } else {
            let parsed = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                ValidationError::InvalidFormat {
                    field: "invoiceDate".to_string(),
                    reason: format!("expected YYYY-MM-DD ({})", e),
                }
            })?;
            Some(parsed)
        };
        self.invoice_date = date;
        Ok(date)
    }

    /// The date as the date input shows its value (`YYYY-MM-DD` or empty).
    pub fn invoice_date_text(&self) -> String {
        self.invoice_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    pub fn logo(&self) -> Option<&LogoImage> {
        self.logo.as_ref()
    }

    pub fn set_logo(&mut self, logo: LogoImage) {
        self.logo = Some(logo);
    }

    // -------------------------------------------------------------------------
    // Derived
    // -------------------------------------------------------------------------

    /// Recomputed from the rows on every call.
    pub fn subtotal(&self) -> Amount {
        subtotal(&self.line_items)
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::from(self.line_items.as_slice())
    }
}

/// `INV-<unix milliseconds>`.
pub fn default_invoice_number(now: DateTime<Utc>) -> String {
    format!("{}{}", INVOICE_NUMBER_PREFIX, now.timestamp_millis())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap()
    }

    fn new_form() -> InvoiceForm {
        InvoiceForm::started_at("Dhruba Creation", fixed_now())
    }

    #[test]
    fn test_initial_state() {
        let form = new_form();
        assert_eq!(form.brand_name(), "Dhruba Creation");
        assert_eq!(form.customer_name(), "");
        assert_eq!(form.invoice_number(), "INV-1710027000000");
        assert_eq!(form.invoice_date_text(), "2024-03-09");
        assert!(form.logo().is_none());
        assert_eq!(form.line_items(), &[LineItem::default()]);
    }

    #[test]
    fn test_add_item_appends_default_and_keeps_prior_rows() {
        let mut form = new_form();
        form.update_item(0, ItemField::Name, "Logo design").unwrap();
        let before = form.line_items()[0].clone();

        let index = form.add_item();

        assert_eq!(index, 1);
        assert_eq!(form.item_count(), 2);
        assert_eq!(form.line_items()[0], before);
        assert_eq!(form.line_items()[1], LineItem::default());
    }

    #[test]
    fn test_add_twice_then_edit_middle_row() {
        let mut form = new_form();
        form.add_item();
        form.add_item();
        assert_eq!(form.item_count(), 3);
        assert!(form.line_items().iter().all(|i| *i == LineItem::default()));

        form.update_item(1, ItemField::UnitPrice, 10).unwrap();
        form.update_item(1, ItemField::Quantity, 2).unwrap();

        assert_eq!(form.subtotal().to_string(), "20.00");
        assert_eq!(form.line_items()[0].line_total().to_string(), "0.00");
        assert_eq!(form.line_items()[2].line_total().to_string(), "0.00");
    }

    #[test]
    fn test_update_touches_only_target_field() {
        let mut form = new_form();
        form.add_item();
        form.update_item(0, ItemField::UnitPrice, "5").unwrap();
        let row0 = form.line_items()[0].clone();

        form.update_item(1, ItemField::Name, "Banner").unwrap();

        assert_eq!(form.line_items()[0], row0);
        let row1 = &form.line_items()[1];
        assert_eq!(row1.name, "Banner");
        assert_eq!(row1.quantity, 1.0);
        assert_eq!(row1.unit_price, 0.0);
    }

    #[test]
    fn test_non_numeric_quantity_propagates_nan() {
        let mut form = new_form();
        form.update_item(0, ItemField::UnitPrice, 3).unwrap();
        let item = form.update_item(0, ItemField::Quantity, "abc").unwrap();

        assert!(item.quantity.is_nan());
        assert_eq!(form.line_items()[0].line_total().to_string(), "NaN");
        assert_eq!(form.subtotal().to_string(), "NaN");
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut form = new_form();
        let before = form.clone();

        let err = form.update_item(4, ItemField::Name, "x").unwrap_err();

        assert!(matches!(
            err,
            CoreError::ItemIndexOutOfRange { index: 4, len: 1 }
        ));
        assert_eq!(form, before);
    }

    #[test]
    fn test_subtotal_tracks_every_mutation() {
        let mut form = new_form();
        let steps: [(usize, ItemField, f64); 4] = [
            (0, ItemField::UnitPrice, 2.5),
            (0, ItemField::Quantity, 3.0),
            (1, ItemField::UnitPrice, 4.0),
            (1, ItemField::Quantity, 0.5),
        ];
        form.add_item();

        for (index, field, value) in steps {
            form.update_item(index, field, value).unwrap();
            let expected: f64 = form
                .line_items()
                .iter()
                .map(|i| i.quantity * i.unit_price)
                .sum();
            assert_eq!(form.subtotal().value(), expected);
        }
        assert_eq!(form.subtotal().to_string(), "9.50");
    }

    #[test]
    fn test_set_invoice_date() {
        let mut form = new_form();
        form.set_invoice_date("2025-01-31").unwrap();
        assert_eq!(form.invoice_date_text(), "2025-01-31");

        assert!(form.set_invoice_date("31/01/2025").is_err());
        assert_eq!(form.invoice_date_text(), "2025-01-31");

        form.set_invoice_date("").unwrap();
        assert_eq!(form.invoice_date(), None);
        assert_eq!(form.invoice_date_text(), "");
    }

    #[test]
    fn test_header_fields_are_free_text() {
        let mut form = new_form();
        form.set_customer_name("Acme Traders");
        form.set_invoice_number("");
        assert_eq!(form.customer_name(), "Acme Traders");
        assert_eq!(form.invoice_number(), "");
    }

    #[test]
    fn test_totals_summary() {
        let mut form = new_form();
        form.update_item(0, ItemField::UnitPrice, 12).unwrap();
        let totals = form.totals();
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total.to_string(), "12.00");
    }
}
