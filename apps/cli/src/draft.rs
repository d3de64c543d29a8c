//! # Invoice Drafts
//!
//! A JSON description of a filled-in form, replayed through the same
//! commands the session uses and then exported in one go.
//!
//! ```json
//! {
//!   "customerName": "Asha Traders",
//!   "invoiceNumber": "INV-2024-017",
//!   "invoiceDate": "2024-07-01",
//!   "logo": "brand.png",
//!   "items": [
//!     { "name": "Poster A2", "quantity": 2, "unitPrice": 450 },
//!     { "name": "Flyer", "quantity": "500", "unitPrice": "1.2" }
//!   ]
//! }
//! ```
//!
//! Missing keys keep the fresh form's values. A relative logo path is
//! resolved against the draft file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use invoice_core::FieldValue;

use crate::commands::form::{set_customer, set_invoice_date, set_invoice_number};
use crate::commands::items::{add_item, update_item};
use crate::commands::logo::upload_logo;
use crate::error::ApiError;
use crate::state::FormState;

/// One row of a draft. Numeric fields may be numbers or text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem {
    pub name: Option<FieldValue>,
    pub quantity: Option<FieldValue>,
    pub unit_price: Option<FieldValue>,
}

/// A saved invoice form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub customer_name: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub items: Vec<DraftItem>,
}

impl Draft {
    /// Reads and parses a draft file.
    pub async fn load(path: &Path) -> Result<Self, ApiError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApiError::new(
                crate::error::ErrorCode::IoError,
                format!("Failed to read draft {}: {}", path.display(), e),
            )
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ApiError> {
        serde_json::from_str(text)
            .map_err(|e| ApiError::validation(format!("Invalid draft: {}", e)))
    }

    /// Replays the draft onto `form`.
    ///
    /// Row `i` of the draft fills row `i` of the form, adding rows as
    /// needed. `base_dir` anchors a relative logo path.
    pub async fn apply(&self, form: &FormState, base_dir: &Path) -> Result<(), ApiError> {
        if let Some(name) = &self.customer_name {
            set_customer(form, name);
        }
        if let Some(number) = &self.invoice_number {
            set_invoice_number(form, number);
        }
        if let Some(date) = &self.invoice_date {
            set_invoice_date(form, date)?;
        }
        if let Some(logo) = &self.logo {
            upload_logo(form, &base_dir.join(logo)).await;
        }

        for (index, item) in self.items.iter().enumerate() {
            if index >= form.with_form(|f| f.item_count()) {
                add_item(form);
            }
            let fields = [
                ("name", &item.name),
                ("quantity", &item.quantity),
                ("unitPrice", &item.unit_price),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    update_item(form, index, field, value.clone())?;
                }
            }
        }

        debug!(rows = self.items.len(), "Draft applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_values() {
        let draft = Draft::parse(
            r#"{
                "customerName": "Asha",
                "items": [
                    { "name": "Poster", "quantity": 2, "unitPrice": "450" },
                    { "quantity": "abc" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(draft.customer_name.as_deref(), Some("Asha"));
        assert_eq!(draft.items[0].quantity, Some(FieldValue::Number(2.0)));
        assert_eq!(draft.items[0].unit_price, Some(FieldValue::Text("450".to_string())));
        assert_eq!(draft.items[1].name, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Draft::parse("{ not json").is_err());
    }

    #[tokio::test]
    async fn test_apply_fills_rows() {
        let form = FormState::new("Dhruba Creation");
        let draft = Draft::parse(
            r#"{
                "invoiceNumber": "INV-9",
                "invoiceDate": "2024-07-01",
                "items": [
                    { "name": "Poster", "quantity": 2, "unitPrice": 10 },
                    { "name": "Flyer", "quantity": "4", "unitPrice": "2.5" }
                ]
            }"#,
        )
        .unwrap();

        draft.apply(&form, Path::new(".")).await.unwrap();

        form.with_form(|f| {
            assert_eq!(f.invoice_number(), "INV-9");
            assert_eq!(f.invoice_date_text(), "2024-07-01");
            assert_eq!(f.item_count(), 2);
            assert_eq!(f.line_items()[1].name, "Flyer");
            assert_eq!(f.subtotal().to_string(), "30.00");
        });
    }

    #[tokio::test]
    async fn test_apply_rejects_bad_date() {
        let form = FormState::new("Dhruba Creation");
        let draft = Draft {
            invoice_date: Some("07/01/2024".to_string()),
            ..Draft::default()
        };

        assert!(draft.apply(&form, Path::new(".")).await.is_err());
    }
}
