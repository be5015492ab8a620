use serde::{Deserialize, Serialize};

use invoicer_core::round2;

use crate::line_item::LineItem;

/// Subtotal, tax and grand total of a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    /// Copy with every figure rounded to two decimals.
    ///
    /// Only apply this when freezing a record; previews must keep calling
    /// [`compute`] on the raw inputs so rounding never accumulates.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round2(self.subtotal),
            tax: round2(self.tax),
            total: round2(self.total),
        }
    }
}

/// Compute totals for `items` at `tax_rate_percent`.
///
/// Pure and idempotent. A non-finite line amount or tax rate counts as zero.
pub fn compute(items: &[LineItem], tax_rate_percent: f64) -> Totals {
    let subtotal: f64 = items
        .iter()
        .map(LineItem::amount)
        .filter(|amount| amount.is_finite())
        .sum();
    let rate = if tax_rate_percent.is_finite() {
        tax_rate_percent
    } else {
        0.0
    };
    let tax = subtotal * (rate / 100.0);
    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}
