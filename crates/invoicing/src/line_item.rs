use serde::{Deserialize, Serialize};

use invoicer_core::{coerce_number, lenient};

/// A single billable line on an invoice.
///
/// Quantity and unit price are plain `f64`s: anything unreadable is coerced
/// to zero on the way in, and negative values are accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(alias = "qty", deserialize_with = "lenient::number")]
    pub quantity: f64,
    #[serde(alias = "price", deserialize_with = "lenient::number")]
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Line used to seed a fresh draft: no description, one unit at zero.
    pub fn blank() -> Self {
        Self::new("", 1.0, 0.0)
    }

    /// Unrounded line amount (`quantity × unit_price`).
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Set one field from raw form input.
    ///
    /// Numeric fields go through [`coerce_number`], so half-typed input such
    /// as `""` or `"-"` reads as zero rather than failing.
    pub fn set_field(&mut self, field: LineItemField, raw: &str) {
        match field {
            LineItemField::Description => self.description = raw.to_string(),
            LineItemField::Quantity => self.quantity = coerce_number(raw),
            LineItemField::UnitPrice => self.unit_price = coerce_number(raw),
        }
    }
}

impl Default for LineItem {
    /// An all-zero line. This is what unreadable imported lines become;
    /// drafts start from [`LineItem::blank`] instead.
    fn default() -> Self {
        Self::new("", 0.0, 0.0)
    }
}

/// Editable field of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Description,
    Quantity,
    UnitPrice,
}
