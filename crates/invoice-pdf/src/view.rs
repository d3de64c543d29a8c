//! # Invoice View
//!
//! The painted snapshot of the invoice: every string the page shows, with
//! numbers already formatted. Rendering reads only this, never the live
//! form, so what gets exported is exactly what was on screen when the
//! export was requested.

use invoice_core::amount::input_value;
use invoice_core::{InvoiceForm, LogoImage};
use serde::{Deserialize, Serialize};

/// Visual variant of the invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Heading, labelled fields, bare rows, one total line.
    Plain,
    /// Logo header with accent bar, table with dark header row, totals box,
    /// terms and a footer strip.
    #[default]
    Styled,
}

/// Static copy and formatting choices that are not part of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub theme: Theme,
    pub currency_symbol: String,
    pub tagline: String,
    pub terms: String,
    pub footer: String,
    pub signature_label: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            theme: Theme::Styled,
            currency_symbol: "₹".to_string(),
            tagline: "Creative Design & Services".to_string(),
            terms: "Thank you for your business. Payment due within agreed terms.".to_string(),
            footer: "Dhruba Creation | Phone | Address | Website".to_string(),
            signature_label: "Authorised Sign".to_string(),
        }
    }
}

/// One painted row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub total: String,
}

/// Everything the invoice page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceView {
    pub theme: Theme,
    pub brand_name: String,
    pub tagline: String,
    pub logo: Option<LogoImage>,
    pub customer_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub rows: Vec<RowView>,
    pub subtotal: String,
    pub total: String,
    pub terms: String,
    pub footer: String,
    pub signature_label: String,
}

impl InvoiceView {
    /// Paints the current form state.
    pub fn capture(form: &InvoiceForm, options: &ViewOptions) -> Self {
        let symbol = options.currency_symbol.as_str();
        let rows = form
            .line_items()
            .iter()
            .map(|item| RowView {
                name: item.name.clone(),
                price: input_value(item.unit_price),
                quantity: input_value(item.quantity),
                total: item.line_total().with_symbol(symbol),
            })
            .collect();
        let totals = form.totals();

        InvoiceView {
            theme: options.theme,
            brand_name: form.brand_name().to_string(),
            tagline: options.tagline.clone(),
            logo: form.logo().cloned(),
            customer_name: form.customer_name().to_string(),
            invoice_number: form.invoice_number().to_string(),
            invoice_date: form.invoice_date_text(),
            rows,
            subtotal: totals.subtotal.with_symbol(symbol),
            total: totals.total.with_symbol(symbol),
            terms: options.terms.clone(),
            footer: options.footer.clone(),
            signature_label: options.signature_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invoice_core::ItemField;

    fn form() -> InvoiceForm {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        InvoiceForm::started_at("Dhruba Creation", now)
    }

    #[test]
    fn test_capture_formats_rows() {
        let mut form = form();
        form.update_item(0, ItemField::Name, "Flyer").unwrap();
        form.update_item(0, ItemField::Quantity, 3).unwrap();
        form.update_item(0, ItemField::UnitPrice, 2.5).unwrap();

        let view = InvoiceView::capture(&form, &ViewOptions::default());

        assert_eq!(
            view.rows,
            vec![RowView {
                name: "Flyer".to_string(),
                price: "2.5".to_string(),
                quantity: "3".to_string(),
                total: "₹ 7.50".to_string(),
            }]
        );
        assert_eq!(view.subtotal, "₹ 7.50");
        assert_eq!(view.total, "₹ 7.50");
        assert_eq!(view.invoice_date, "2024-01-02");
    }

    #[test]
    fn test_capture_blanks_bad_input_but_totals_show_nan() {
        let mut form = form();
        form.update_item(0, ItemField::Quantity, "abc").unwrap();
        form.update_item(0, ItemField::UnitPrice, 4).unwrap();

        let view = InvoiceView::capture(&form, &ViewOptions::default());

        assert_eq!(view.rows[0].quantity, "");
        assert_eq!(view.rows[0].price, "4");
        assert_eq!(view.rows[0].total, "₹ NaN");
        assert_eq!(view.total, "₹ NaN");
    }

    #[test]
    fn test_capture_is_a_snapshot() {
        let mut form = form();
        form.set_invoice_number("INV-A");
        let view = InvoiceView::capture(&form, &ViewOptions::default());

        form.set_invoice_number("INV-B");

        assert_eq!(view.invoice_number, "INV-A");
    }

    #[test]
    fn test_theme_deserializes_lowercase() {
        let theme: Theme = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(theme, Theme::Plain);
    }
}
