//! # Domain Types
//!
//! Line items and the addressing used to edit them.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │    ItemField    │   │   FieldValue    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  Name           │   │  Text(String)   │       │
//! │  │  quantity (f64) │   │  Quantity       │   │  Number(f64)    │       │
//! │  │  unit_price     │   │  UnitPrice      │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Rows have no id. A row is its position in the form's item list, which is
//! stable because rows are only ever appended.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::amount::{display_number, Amount};
use crate::coerce::coerce_number;
use crate::error::ValidationError;
use crate::{DEFAULT_QUANTITY, DEFAULT_UNIT_PRICE};

// =============================================================================
// Line Item
// =============================================================================

/// One invoice row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Free-form description, may be empty.
    pub name: String,

    /// Quantity as coerced from input. May be `NaN`.
    pub quantity: f64,

    /// Unit price as coerced from input. May be `NaN`.
    pub unit_price: f64,
}

impl LineItem {
    /// `quantity × unit_price`, recomputed on every call.
    pub fn line_total(&self) -> Amount {
        Amount::new(self.unit_price) * self.quantity
    }

    /// Replaces one field. Numeric fields go through [`coerce_number`].
    pub fn set_field(&mut self, field: ItemField, value: FieldValue) {
        match field {
            ItemField::Name => self.name = value.into_text(),
            ItemField::Quantity => self.quantity = value.into_number(),
            ItemField::UnitPrice => self.unit_price = value.into_number(),
        }
    }
}

impl Default for LineItem {
    /// `{ name: "", quantity: 1, unitPrice: 0 }`
    fn default() -> Self {
        LineItem {
            name: String::new(),
            quantity: DEFAULT_QUANTITY,
            unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}

// =============================================================================
// Item Field
// =============================================================================

/// The editable columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ItemField {
    Name,
    Quantity,
    UnitPrice,
}

impl ItemField {
    /// Every field, in column order of the plain layout.
    pub const ALL: [ItemField; 3] = [ItemField::Name, ItemField::UnitPrice, ItemField::Quantity];

    /// Wire name used in commands and JSON.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemField::Name => "name",
            ItemField::Quantity => "quantity",
            ItemField::UnitPrice => "unitPrice",
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemField {
    type Err = ValidationError;

    /// Accepts the wire names plus the short `qty` / `price` aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ItemField::Name),
            "quantity" | "qty" => Ok(ItemField::Quantity),
            "unitPrice" | "unit_price" | "price" => Ok(ItemField::UnitPrice),
            other => Err(ValidationError::NotAllowed {
                field: format!("field '{}'", other),
                allowed: ItemField::ALL.iter().map(|f| f.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Field Value
// =============================================================================

/// A value headed for a row field, before coercion.
///
/// Drafts may carry numbers either as JSON numbers or as text, so this
/// deserializes untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Number coercion: text goes through [`coerce_number`].
    pub fn into_number(self) -> f64 {
        match self {
            FieldValue::Number(n) => n,
            FieldValue::Text(s) => coerce_number(&s),
        }
    }

    /// Text coercion: numbers print the way an input would echo them.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Number(n) => display_number(n),
            FieldValue::Text(s) => s,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_line_item() {
        let item = LineItem::default();
        assert_eq!(item.name, "");
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit_price, 0.0);
        assert_eq!(item.line_total().to_string(), "0.00");
    }

    #[test]
    fn test_line_total_formatting() {
        let item = LineItem {
            name: "Poster".to_string(),
            quantity: 3.0,
            unit_price: 2.5,
        };
        assert_eq!(item.line_total().to_string(), "7.50");
    }

    #[test]
    fn test_set_field_coerces_numeric_text() {
        let mut item = LineItem::default();
        item.set_field(ItemField::UnitPrice, "12.25".into());
        item.set_field(ItemField::Quantity, "abc".into());
        assert_eq!(item.unit_price, 12.25);
        assert!(item.quantity.is_nan());
        assert!(item.line_total().is_nan());
    }

    #[test]
    fn test_set_name_from_number() {
        let mut item = LineItem::default();
        item.set_field(ItemField::Name, 42.into());
        assert_eq!(item.name, "42");
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("qty".parse::<ItemField>().unwrap(), ItemField::Quantity);
        assert_eq!("price".parse::<ItemField>().unwrap(), ItemField::UnitPrice);
        assert_eq!("unitPrice".parse::<ItemField>().unwrap(), ItemField::UnitPrice);
        assert!("colour".parse::<ItemField>().is_err());
    }

    #[test]
    fn test_field_value_deserializes_untagged() {
        let n: FieldValue = serde_json::from_str("2.5").unwrap();
        let s: FieldValue = serde_json::from_str("\"2.5\"").unwrap();
        assert_eq!(n, FieldValue::Number(2.5));
        assert_eq!(s.into_number(), 2.5);
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let json = serde_json::to_value(LineItem::default()).unwrap();
        assert_eq!(json["unitPrice"], 0.0);
        assert_eq!(json["quantity"], 1.0);
    }
}
