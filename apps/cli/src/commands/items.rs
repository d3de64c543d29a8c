//! # Line Item Commands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Row Lifecycle                                                          │
//! │                                                                         │
//! │  add_item ──► { name: "", quantity: 1, unitPrice: 0 }                   │
//! │                    │                                                    │
//! │               update_item(i, field, value)                              │
//! │                    │   name      → stored as typed                      │
//! │                    │   quantity  → Number(value), NaN kept              │
//! │                    │   unitPrice → Number(value), NaN kept              │
//! │                    ▼                                                    │
//! │               subtotal recomputed on every read                         │
//! │                                                                         │
//! │  Rows are never removed or reordered.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use invoice_core::{FieldValue, InvoiceForm, InvoiceTotals, ItemField, LineItem};

use crate::error::ApiError;
use crate::state::FormState;

/// Rows plus the recomputed totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse {
    pub items: Vec<LineItem>,
    pub totals: InvoiceTotals,
}

impl From<&InvoiceForm> for ItemsResponse {
    fn from(form: &InvoiceForm) -> Self {
        ItemsResponse {
            items: form.line_items().to_vec(),
            totals: form.totals(),
        }
    }
}

/// Appends a default row.
pub fn add_item(form: &FormState) -> ItemsResponse {
    debug!("add_item command");
    form.with_form_mut(|f| {
        let index = f.add_item();
        debug!(index, "Row added");
        ItemsResponse::from(&*f)
    })
}

/// Replaces one field of the row at `index`.
///
/// ## Arguments
/// * `index` - Zero-based row position
/// * `field` - `name`, `quantity` (`qty`) or `unitPrice` (`price`)
/// * `value` - Text or number; numeric fields coerce text
///
/// ## Errors
/// Unknown field names and indexes past the last row are rejected and the
/// form is left unchanged.
pub fn update_item(
    form: &FormState,
    index: usize,
    field: &str,
    value: impl Into<FieldValue>,
) -> Result<ItemsResponse, ApiError> {
    let field: ItemField = field.parse()?;
    let value = value.into();
    debug!(index, field = %field, value = ?value, "update_item command");

    form.with_form_mut(|f| {
        f.update_item(index, field, value)?;
        Ok(ItemsResponse::from(&*f))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_add_then_fill_rows() {
        let state = FormState::new("Dhruba Creation");

        let response = add_item(&state);
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[1].quantity, 1.0);

        update_item(&state, 0, "quantity", 2).unwrap();
        update_item(&state, 0, "unitPrice", 10).unwrap();
        update_item(&state, 1, "price", "2.5").unwrap();
        let response = update_item(&state, 1, "qty", "4").unwrap();

        assert_eq!(response.totals.subtotal.to_string(), "30.00");
    }

    #[test]
    fn test_bad_number_poisons_subtotal() {
        let state = FormState::new("Dhruba Creation");
        let response = update_item(&state, 0, "quantity", "abc").unwrap();

        assert!(response.items[0].quantity.is_nan());
        assert_eq!(response.totals.subtotal.to_string(), "NaN");
    }

    #[test]
    fn test_out_of_range_leaves_form_unchanged() {
        let state = FormState::new("Dhruba Creation");
        let before = state.with_form(|f| f.clone());

        let err = update_item(&state, 5, "name", "Ghost").unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(state.with_form(|f| f.clone()), before);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let state = FormState::new("Dhruba Creation");
        let err = update_item(&state, 0, "colour", "red").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
