//! # Totals
//!
//! The one reduction the form performs. Nothing here is cached: the item
//! list is small and every read recomputes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::Amount;
use crate::types::LineItem;

/// `Σ quantity × unit_price` over the rows, in order.
///
/// An empty slice gives `0.00`; any `NaN` row makes the result `NaN`.
pub fn subtotal(items: &[LineItem]) -> Amount {
    items.iter().map(LineItem::line_total).sum()
}

/// Totals summary for responses and the painted footer.
///
/// There is no tax or discount, so `total` always equals `subtotal`; both
/// exist because the styled invoice prints both lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub item_count: usize,
    pub subtotal: Amount,
    pub total: Amount,
}

impl From<&[LineItem]> for InvoiceTotals {
    fn from(items: &[LineItem]) -> Self {
        let subtotal = subtotal(items);
        InvoiceTotals {
            item_count: items.len(),
            subtotal,
            total: subtotal,
        }
    }
}
