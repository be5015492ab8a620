use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicer_core::{DomainError, DomainResult, coerce_number};

use crate::line_item::{LineItem, LineItemField};
use crate::totals::{Totals, compute};

/// The invoice being edited before it is saved.
///
/// Totals are never stored here; call [`InvoiceDraft::totals`] after every
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub client_name: String,
    pub client_address: String,
    /// Issue date, `YYYY-MM-DD`.
    pub date: String,
    /// Due date, `YYYY-MM-DD` or empty.
    pub due_date: String,
    pub items: Vec<LineItem>,
    /// Tax rate in percent.
    pub tax_rate: f64,
    pub notes: String,
}

impl InvoiceDraft {
    /// Blank draft dated `today` with a single blank line.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            client_name: String::new(),
            client_address: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            due_date: String::new(),
            items: vec![LineItem::blank()],
            tax_rate: 0.0,
            notes: String::new(),
        }
    }

    /// Back to a blank draft dated `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn add_item(&mut self) {
        self.items.push(LineItem::blank());
    }

    /// Remove the line at `index`.
    ///
    /// The last remaining line cannot be removed; returns `false` when nothing
    /// was removed.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if self.items.len() <= 1 || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Edit a line from raw form input. Returns `false` for an unknown index.
    pub fn update_item(&mut self, index: usize, field: LineItemField, raw: &str) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.set_field(field, raw);
                true
            }
            None => false,
        }
    }

    /// Set the tax rate from raw form input (unreadable → 0).
    pub fn set_tax_rate(&mut self, raw: &str) {
        self.tax_rate = coerce_number(raw);
    }

    /// Live, unrounded totals.
    pub fn totals(&self) -> Totals {
        compute(&self.items, self.tax_rate)
    }

    /// Check the draft can be saved: a client name and at least one line.
    pub fn validate(&self) -> DomainResult<()> {
        if self.client_name.trim().is_empty() {
            return Err(DomainError::validation("client name is required"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "invoice needs at least one line item",
            ));
        }
        Ok(())
    }
}
